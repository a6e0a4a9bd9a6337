//! Conversion between legacy HTML, Slate rich text and Volto block trees
//!
//!     This crate turns authored HTML into the block-structured content model of a Volto site,
//!     renders block trees as annotated HTML for translation, and reads the translated markup
//!     back into content fields.
//!
//!     TLDR: For codec authors:
//!         - Every block type with a non-trivial payload gets a BlockCodec (./codec.rs), registered by name in the CodecRegistry.
//!         - A codec renders translatable text as real markup and everything else as residual JSON on the wrapper.
//!         - Whatever a codec writes it must read back: encode then decode yields the original payload.
//!         - Unknown types go through the generic fields codec, and a diagnostic is recorded.
//!
//! Architecture
//!
//!     There are three representations: HTML (parsed with html5ever into an RcDom), the rich-text
//!     value (./ast, a tree of elements and marked text leaves) and the block tree (./blocks).
//!
//!     HTML → blocks runs the widget preprocessors over the DOM (./blocks/preprocess.rs), which
//!     replace recognised markup with placeholder elements carrying block JSON. The remaining
//!     markup is deserialized into a rich-text value, normalized, and split into blocks
//!     (./blocks/extract.rs).
//!
//!     Blocks → HTML and back are the codecs (./codecs). Container blocks recurse through the same
//!     driver, bounded by the nesting limit in the settings.
//!
//!     This is a pure lib: it powers volto-cli but reads no files, environment or stdin. Settings
//!     and id sources are injected, and diagnostics are collected in a sink passed by the caller.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── settings.rs             # Tag tables, column widths, nesting limit
//!     ├── ids.rs                  # IdSource: uuid and sequential ids
//!     ├── diagnostics.rs          # Recoverable warnings
//!     ├── markers.rs              # data-* attribute names
//!     ├── dom.rs                  # RcDom helpers
//!     ├── context.rs              # Per-call state
//!     ├── ast                     # HTML ↔ rich text
//!     │   ├── whitespace.rs
//!     │   ├── deserializer.rs
//!     │   ├── normalize.rs
//!     │   └── serializer.rs
//!     ├── blocks                  # HTML → blocks
//!     │   ├── preprocess.rs
//!     │   ├── extract.rs
//!     │   └── pipeline.rs
//!     ├── codec.rs                # BlockCodec trait and the encode/decode drivers
//!     ├── registry.rs             # CodecRegistry
//!     ├── codecs                  # Codec implementations
//!     └── converter.rs            # Converter: the public entry points
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── <area>.rs
//!     └── fixtures
//!
//!     Unit tests live next to the code; the tests/ directory holds end to end scenarios over the
//!     public API, plus property tests for the whitespace and normalization invariants.
//!
pub mod ast;
pub mod blocks;
pub mod codec;
pub mod codecs;
pub mod context;
pub mod converter;
pub mod diagnostics;
pub mod dom;
pub mod error;
pub mod ids;
pub mod markers;
pub mod registry;
pub mod settings;

pub use ast::{ElementNode, Node, TextNode};
pub use blocks::{Block, BlockTree};
pub use codec::{BlockCodec, Content, ContentField};
pub use converter::Converter;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::ConvertError;
pub use ids::{IdSource, SequentialIds, UuidIds};
pub use registry::CodecRegistry;
pub use settings::Settings;

/// Parses HTML into a rich-text value with the default settings.
pub fn html_to_ast(html: &str) -> Result<Vec<Node>, ConvertError> {
    Converter::default().html_to_ast(html)
}

/// Renders a rich-text value as HTML with the default settings.
pub fn ast_to_html(nodes: &[Node]) -> Result<String, ConvertError> {
    Converter::default().ast_to_html(nodes)
}

/// Converts authored HTML into a block tree.
///
/// Diagnostics are only logged; use [`Converter::html_to_blocks`] to collect them.
pub fn html_to_blocks(html: &str) -> Result<BlockTree, ConvertError> {
    Converter::default().html_to_blocks(html, &mut Diagnostics::new())
}

/// Renders a block tree as annotated HTML.
pub fn blocks_to_html(tree: &BlockTree) -> Result<String, ConvertError> {
    Converter::default().blocks_to_html(tree, &mut Diagnostics::new())
}

/// Reads annotated HTML back into content fields.
pub fn annotated_html_to_content(html: &str) -> Result<Content, ConvertError> {
    Converter::default().annotated_html_to_content(html, &mut Diagnostics::new())
}
