//! Shared helpers for the integration tests.

use std::sync::Arc;
use volto_babel::{BlockTree, ContentField, Converter, Diagnostics, SequentialIds};

/// A converter with deterministic ids (`id-1`, `id-2`, ...).
pub fn converter() -> Converter {
    Converter::default().with_ids(Arc::new(SequentialIds::default()))
}

pub fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {path}: {e}"))
}

/// Authored HTML → blocks, with the diagnostics of the call.
pub fn to_blocks(html: &str) -> (BlockTree, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let tree = converter()
        .html_to_blocks(html, &mut diagnostics)
        .expect("html_to_blocks failed");
    (tree, diagnostics)
}

/// Blocks → annotated HTML → blocks.
pub fn round_trip(tree: &BlockTree) -> (String, BlockTree) {
    let converter = converter();
    let mut diagnostics = Diagnostics::new();
    let html = converter
        .blocks_to_html(tree, &mut diagnostics)
        .expect("blocks_to_html failed");
    let document = format!(r#"<div data-field="blocks">{html}</div>"#);
    let mut content = converter
        .annotated_html_to_content(&document, &mut diagnostics)
        .expect("annotated_html_to_content failed");
    match content.remove("blocks") {
        Some(ContentField::Blocks(decoded)) => (html, decoded),
        other => panic!("expected a blocks field, got {other:?}"),
    }
}

/// Types of the top-level blocks in layout order.
pub fn types(tree: &BlockTree) -> Vec<String> {
    tree.ordered()
        .iter()
        .map(|(_, block)| block.block_type().unwrap_or_default().to_string())
        .collect()
}
