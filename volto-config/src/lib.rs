//! Shared configuration loader for the volto conversion tools.
//!
//! `defaults/volto.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`VoltoConfig`],
//! then hand the conversion part to the library as [`Settings`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use volto_babel::Settings;

const DEFAULT_TOML: &str = include_str!("../defaults/volto.default.toml");

/// Top-level configuration consumed by volto applications.
#[derive(Debug, Clone, Deserialize)]
pub struct VoltoConfig {
    pub slate: SlateConfig,
    pub blocks: BlocksConfig,
    pub log: LogConfig,
}

/// Tag and type tables of the HTML ↔ Slate conversion.
#[derive(Debug, Clone, Deserialize)]
pub struct SlateConfig {
    pub accepted_tags: Vec<String>,
    pub inline_elements: Vec<String>,
    pub default_block_type: String,
    pub toplevel_types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlocksConfig {
    pub max_depth: usize,
    pub column_widths: Vec<ColumnWidthConfig>,
}

/// Grid width name for cells spanning `span` of 12 columns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnWidthConfig {
    pub span: usize,
    pub width: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default `tracing` filter directive
    pub filter: String,
}

impl From<&VoltoConfig> for Settings {
    fn from(config: &VoltoConfig) -> Self {
        Settings {
            accepted_tags: config.slate.accepted_tags.iter().cloned().collect(),
            inline_elements: config.slate.inline_elements.iter().cloned().collect(),
            default_block_type: config.slate.default_block_type.clone(),
            toplevel_types: config.slate.toplevel_types.iter().cloned().collect(),
            column_widths: config
                .blocks
                .column_widths
                .iter()
                .map(|entry| (entry.span, entry.width.clone()))
                .collect(),
            max_depth: config.blocks.max_depth,
        }
    }
}

impl From<VoltoConfig> for Settings {
    fn from(config: VoltoConfig) -> Self {
        Settings::from(&config)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<VoltoConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<VoltoConfig, ConfigError> {
    Loader::new().build()
}
