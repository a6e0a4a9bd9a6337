//! Codec registry for block type lookup
//!
//! This module maps block types to the codecs that render them as annotated
//! HTML and read them back. Types without an entry go through the generic
//! fallback codec.

use crate::codec::BlockCodec;
use crate::codecs::fields::{FieldsCodec, ImageCodec, TitleCodec};
use crate::codecs::layout::{ColumnsCodec, GridCodec, GroupCodec, HeroCodec, TitledColumnsCodec};
use crate::codecs::richtext::{SlateCodec, SlateFieldCodec, TableCodec};
use crate::codecs::teaser::{TeaserCodec, TeaserGridCodec};
use std::collections::HashMap;

/// Registry of block codecs
///
/// # Examples
///
/// ```ignore
/// let mut registry = CodecRegistry::new();
/// registry.register(FieldsCodec::new("maps", &[]));
///
/// let codec = registry.get("maps").unwrap();
/// ```
pub struct CodecRegistry {
    codecs: HashMap<String, Box<dyn BlockCodec>>,
    fallback: Box<dyn BlockCodec>,
}

impl CodecRegistry {
    /// Create a registry with only the generic fallback
    pub fn new() -> Self {
        CodecRegistry {
            codecs: HashMap::new(),
            fallback: Box::new(FieldsCodec::generic()),
        }
    }

    /// Register a codec
    ///
    /// If a codec for the same block type already exists, it will be replaced.
    pub fn register<C: BlockCodec + 'static>(&mut self, codec: C) {
        self.codecs.insert(codec.name().to_string(), Box::new(codec));
    }

    /// Get the codec for a block type
    pub fn get(&self, block_type: &str) -> Option<&dyn BlockCodec> {
        self.codecs.get(block_type).map(|c| c.as_ref())
    }

    /// Codec used for block types nothing is registered for
    pub fn fallback(&self) -> &dyn BlockCodec {
        self.fallback.as_ref()
    }

    /// Check if a block type has a codec
    pub fn has(&self, block_type: &str) -> bool {
        self.codecs.contains_key(block_type)
    }

    /// List all registered block types (sorted)
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<_> = self.codecs.keys().cloned().collect();
        names.sort();
        names
    }

    /// Create a registry with the built-in codecs
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // Rich text
        registry.register(SlateCodec);
        registry.register(TableCodec);
        registry.register(SlateFieldCodec::new("quote", "value"));
        registry.register(SlateFieldCodec::new("callout", "value"));
        registry.register(SlateFieldCodec::new("item", "description"));

        // Containers
        registry.register(ColumnsCodec);
        registry.register(TitledColumnsCodec::new("tabs_block"));
        registry.register(TitledColumnsCodec::new("accordion"));
        registry.register(GroupCodec);
        registry.register(GridCodec);
        registry.register(HeroCodec);
        registry.register(TeaserGridCodec);
        registry.register(TeaserCodec);

        // Flat payloads
        registry.register(ImageCodec);
        registry.register(TitleCodec);
        registry.register(FieldsCodec::new("nextCloudVideo", &["title"]));
        registry.register(FieldsCodec::new("layoutSettings", &[]));
        registry.register(FieldsCodec::new("callToActionBlock", &["text"]));
        registry.register(FieldsCodec::new("searchlib", &["searchInputPlaceholder"]));
        registry.register(FieldsCodec::new("maps", &[]));
        registry.register(FieldsCodec::new(
            "readMoreBlock",
            &["label_closed", "label_opened"],
        ));

        registry
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
