//! The conversion entry points
//!
//! [`Converter`] owns the read-only pieces every conversion needs (settings,
//! id source, codec registry) and is `Send + Sync`, so one instance can serve
//! concurrent requests. Each call builds its own [`Context`]; nothing is
//! shared between calls except what the converter owns.

use crate::ast::{HtmlDeserializer, HtmlSerializer, Node};
use crate::blocks::{pipeline, BlockTree};
use crate::codec::{self, Content};
use crate::context::Context;
use crate::diagnostics::Diagnostics;
use crate::error::ConvertError;
use crate::ids::{IdSource, UuidIds};
use crate::registry::CodecRegistry;
use crate::settings::Settings;
use std::sync::Arc;

pub struct Converter {
    settings: Settings,
    ids: Arc<dyn IdSource>,
    registry: CodecRegistry,
}

impl Converter {
    /// A converter with random ids and the built-in codecs.
    pub fn new(settings: Settings) -> Self {
        Converter {
            settings,
            ids: Arc::new(UuidIds),
            registry: CodecRegistry::with_defaults(),
        }
    }

    /// Replace the id source (e.g. with [`crate::SequentialIds`] for stable output).
    pub fn with_ids(mut self, ids: Arc<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_registry(mut self, registry: CodecRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    fn context<'a>(&'a self, diagnostics: &'a mut Diagnostics) -> Context<'a> {
        Context::new(&self.settings, self.ids.as_ref(), &self.registry, diagnostics)
    }

    /// HTML → rich text.
    pub fn html_to_ast(&self, html: &str) -> Result<Vec<Node>, ConvertError> {
        HtmlDeserializer::new(&self.settings).from_html(html)
    }

    /// Rich text → HTML.
    pub fn ast_to_html(&self, nodes: &[Node]) -> Result<String, ConvertError> {
        HtmlSerializer::new(&self.settings).to_html(nodes)
    }

    /// Authored HTML → block tree.
    pub fn html_to_blocks(
        &self,
        html: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<BlockTree, ConvertError> {
        let mut ctx = self.context(diagnostics);
        let blocks = pipeline::html_to_blocks(&mut ctx, html)?;
        Ok(BlockTree::from_pairs(blocks))
    }

    /// Block tree → annotated HTML.
    pub fn blocks_to_html(
        &self,
        tree: &BlockTree,
        diagnostics: &mut Diagnostics,
    ) -> Result<String, ConvertError> {
        let mut ctx = self.context(diagnostics);
        codec::blocks_to_html(&mut ctx, tree)
    }

    /// Annotated HTML → content fields.
    pub fn annotated_html_to_content(
        &self,
        html: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Content, ConvertError> {
        let mut ctx = self.context(diagnostics);
        codec::annotated_html_to_content(&mut ctx, html)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
