//! Per-call conversion state
//!
//! A [`Context`] bundles the read-only pieces of a [`crate::Converter`]
//! (settings, id source, codec registry) with the mutable state of a single
//! call: the diagnostics sink and the current nesting depth.

use crate::ast::{HtmlDeserializer, HtmlSerializer};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::ConvertError;
use crate::ids::IdSource;
use crate::registry::CodecRegistry;
use crate::settings::Settings;

pub struct Context<'a> {
    settings: &'a Settings,
    ids: &'a dyn IdSource,
    registry: &'a CodecRegistry,
    diagnostics: &'a mut Diagnostics,
    depth: usize,
}

impl<'a> Context<'a> {
    pub fn new(
        settings: &'a Settings,
        ids: &'a dyn IdSource,
        registry: &'a CodecRegistry,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Context {
            settings,
            ids,
            registry,
            diagnostics,
            depth: 0,
        }
    }

    pub fn settings(&self) -> &'a Settings {
        self.settings
    }

    pub fn registry(&self) -> &'a CodecRegistry {
        self.registry
    }

    pub fn fresh_id(&self) -> String {
        self.ids.fresh_id()
    }

    pub fn warn(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.diagnostics.warn(kind, message);
    }

    pub fn deserializer(&self) -> HtmlDeserializer<'a> {
        HtmlDeserializer::new(self.settings)
    }

    pub fn serializer(&self) -> HtmlSerializer<'a> {
        HtmlSerializer::new(self.settings)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Run `f` one nesting level deeper, failing past the configured limit.
    pub fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ConvertError>,
    ) -> Result<T, ConvertError> {
        if self.depth >= self.settings.max_depth {
            return Err(ConvertError::DepthExceeded(self.settings.max_depth));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}
