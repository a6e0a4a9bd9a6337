//! Block codec trait and the block ↔ annotated HTML drivers
//!
//! A [`BlockCodec`] renders one block type as an HTML fragment and reads it
//! back. The fragment keeps translatable text as element content and carries
//! everything else (the residual payload) as JSON in `data-volto-block`, so a
//! translation tool that only edits visible text can pass it through.
//!
//! The drivers below walk block trees, pick the codec for each block from the
//! [`crate::registry::CodecRegistry`] and recurse into nested trees.

use crate::blocks::{pipeline, Block, BlockTree};
use crate::context::Context;
use crate::diagnostics::DiagnosticKind;
use crate::dom;
use crate::error::ConvertError;
use crate::markers::{BLOCK_DATA, BLOCK_TYPE, BLOCK_UID, CONTENT_FIELD, FIELD_NAME};
use markup5ever_rcdom::Handle;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Trait for block codecs
///
/// Implementors convert one block type between its JSON payload and an
/// annotated HTML fragment. `decode(encode(block))` must give the block back.
///
/// # Examples
///
/// ```ignore
/// struct MapsCodec;
///
/// impl BlockCodec for MapsCodec {
///     fn name(&self) -> &str {
///         "maps"
///     }
///
///     fn encode(&self, id: &str, block: &Block, ctx: &mut Context<'_>) -> Result<Vec<Handle>, ConvertError> {
///         Ok(vec![wrapper("maps", id, &block.residual(&[]))?])
///     }
///
///     fn decode(&self, fragment: &Handle, ctx: &mut Context<'_>) -> Result<Block, ConvertError> {
///         read_block(fragment)
///     }
/// }
/// ```
pub trait BlockCodec: Send + Sync {
    /// The block type this codec handles (e.g. "slate", "columnsBlock")
    fn name(&self) -> &str;

    /// Optional description of this codec
    fn description(&self) -> &str {
        ""
    }

    /// Render a block as top-level HTML nodes.
    fn encode(
        &self,
        id: &str,
        block: &Block,
        ctx: &mut Context<'_>,
    ) -> Result<Vec<Handle>, ConvertError>;

    /// Rebuild a block from the element [`BlockCodec::encode`] produced.
    fn decode(&self, fragment: &Handle, ctx: &mut Context<'_>) -> Result<Block, ConvertError>;
}

/// One top-level field of an annotated document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentField {
    Blocks(BlockTree),
    Text(String),
}

/// Content fields keyed by their `data-field` name
pub type Content = BTreeMap<String, ContentField>;

pub(crate) fn to_json(map: &Map<String, Value>) -> Result<String, ConvertError> {
    serde_json::to_string(map).map_err(|e| ConvertError::Serialization(e.to_string()))
}

/// `<div data-block-type data-block-uid data-volto-block>`, the element every
/// codec but the image one hangs its content on.
pub fn wrapper(
    block_type: &str,
    id: &str,
    residual: &Map<String, Value>,
) -> Result<Handle, ConvertError> {
    let json = to_json(residual)?;
    let mut attrs = vec![(BLOCK_TYPE, block_type)];
    if !id.is_empty() {
        attrs.push((BLOCK_UID, id));
    }
    attrs.push((BLOCK_DATA, json.as_str()));
    Ok(dom::create_element("div", &attrs))
}

/// `<div data-fieldname="{name}">{text}</div>`
pub fn field_div(name: &str, text: &str) -> Handle {
    dom::element_with_text("div", &[(FIELD_NAME, name)], text)
}

/// Block type plus residual payload of a wrapper element.
pub fn read_block(fragment: &Handle) -> Result<Block, ConvertError> {
    let block_type = dom::attr(fragment, BLOCK_TYPE).unwrap_or_default();
    let mut block = Block::new(&block_type);
    for (key, value) in dom::json_object_attr(fragment, BLOCK_DATA)? {
        if key != "@type" {
            block.insert(&key, value);
        }
    }
    Ok(block)
}

/// Direct child elements carrying `data-fieldname`, with their text.
pub fn read_fields(fragment: &Handle) -> Vec<(String, String)> {
    dom::element_children(fragment)
        .into_iter()
        .filter_map(|child| {
            dom::attr(&child, FIELD_NAME).map(|name| (name, dom::text_content(&child)))
        })
        .collect()
}

fn codec_for<'a>(ctx: &mut Context<'a>, block_type: &str) -> &'a dyn BlockCodec {
    let registry = ctx.registry();
    match registry.get(block_type) {
        Some(codec) => codec,
        None => {
            ctx.warn(
                DiagnosticKind::UnknownBlockType,
                format!("no codec for block type '{block_type}', using the generic one"),
            );
            registry.fallback()
        }
    }
}

/// Encode one block with the codec registered for its type.
pub fn encode_block(
    ctx: &mut Context<'_>,
    id: &str,
    block: &Block,
) -> Result<Vec<Handle>, ConvertError> {
    let Some(block_type) = block.block_type() else {
        return Err(ConvertError::InvalidBlock(format!("block '{id}' has no @type")));
    };
    let codec = codec_for(ctx, block_type);
    codec.encode(id, block, ctx)
}

fn encode_layout(ctx: &mut Context<'_>, tree: &BlockTree) -> Result<Vec<Vec<Handle>>, ConvertError> {
    let mut fragments = Vec::with_capacity(tree.len());
    for (id, block) in tree.iter() {
        match block {
            Some(block) => fragments.push(encode_block(ctx, id, block)?),
            None => ctx.warn(
                DiagnosticKind::MissingBlock,
                format!("layout lists '{id}' but the tree has no such block"),
            ),
        }
    }
    Ok(fragments)
}

/// Encode a nested tree, one level deeper.
pub fn encode_tree(ctx: &mut Context<'_>, tree: &BlockTree) -> Result<Vec<Handle>, ConvertError> {
    ctx.nested(|ctx| Ok(encode_layout(ctx, tree)?.into_iter().flatten().collect()))
}

/// Render a page's blocks as annotated HTML, one fragment per line.
pub fn blocks_to_html(ctx: &mut Context<'_>, tree: &BlockTree) -> Result<String, ConvertError> {
    let mut out = Vec::new();
    for nodes in encode_layout(ctx, tree)? {
        if !nodes.is_empty() {
            out.push(dom::nodes_to_html(&nodes)?);
        }
    }
    Ok(out.join("\n"))
}

/// Decode one fragment. Markup without a block type is converted like
/// authored HTML and may yield several blocks.
pub fn decode_fragment(
    ctx: &mut Context<'_>,
    fragment: &Handle,
) -> Result<Vec<(String, Block)>, ConvertError> {
    let Some(block_type) = dom::attr(fragment, BLOCK_TYPE) else {
        return pipeline::element_to_blocks(ctx, fragment);
    };
    let codec = codec_for(ctx, &block_type);
    let block = codec.decode(fragment, ctx)?;
    Ok(vec![(element_id(ctx, fragment), block)])
}

/// The `data-block-uid` of an element, or a fresh id.
pub fn element_id(ctx: &Context<'_>, element: &Handle) -> String {
    dom::attr(element, BLOCK_UID)
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| ctx.fresh_id())
}

fn collect_blocks(ctx: &mut Context<'_>, elements: &[Handle]) -> Result<BlockTree, ConvertError> {
    let mut tree = BlockTree::new();
    for element in elements.iter().filter(|e| dom::is_element(e)) {
        for (id, block) in decode_fragment(ctx, element)? {
            tree.push(id, block);
        }
    }
    Ok(tree)
}

/// Decode sibling fragments into a nested tree, one level deeper.
pub fn decode_tree(ctx: &mut Context<'_>, elements: &[Handle]) -> Result<BlockTree, ConvertError> {
    ctx.nested(|ctx| collect_blocks(ctx, elements))
}

/// Read the content fields of an annotated document.
///
/// Direct children of `<body>` carrying `data-field` are fields; the one
/// named `blocks` holds block fragments, every other one plain text.
pub fn annotated_html_to_content(ctx: &mut Context<'_>, html: &str) -> Result<Content, ConvertError> {
    let mut content = Content::new();
    let document = dom::parse(html);
    let Some(body) = dom::body(&document) else {
        return Ok(content);
    };

    for element in dom::element_children(&body) {
        let Some(field) = dom::attr(&element, CONTENT_FIELD).filter(|f| !f.is_empty()) else {
            continue;
        };
        let value = if field == "blocks" {
            ContentField::Blocks(collect_blocks(ctx, &dom::children(&element))?)
        } else {
            ContentField::Text(dom::text_content(&element))
        };
        content.insert(field, value);
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::ids::SequentialIds;
    use crate::registry::CodecRegistry;
    use crate::settings::Settings;
    use serde_json::json;

    fn with_ctx<T>(f: impl FnOnce(&mut Context<'_>) -> T) -> (T, Diagnostics) {
        let settings = Settings::default();
        let ids = SequentialIds::default();
        let registry = CodecRegistry::with_defaults();
        let mut diagnostics = Diagnostics::new();
        let out = {
            let mut ctx = Context::new(&settings, &ids, &registry, &mut diagnostics);
            f(&mut ctx)
        };
        (out, diagnostics)
    }

    #[test]
    fn wrapper_carries_type_id_and_residual() {
        let mut residual = Map::new();
        residual.insert("url".to_string(), json!("/m"));
        let div = wrapper("maps", "b1", &residual).unwrap();
        assert_eq!(dom::attr(&div, BLOCK_TYPE).as_deref(), Some("maps"));
        assert_eq!(dom::attr(&div, BLOCK_UID).as_deref(), Some("b1"));
        assert_eq!(read_block(&div).unwrap(), Block::new("maps").with("url", "/m"));

        let anonymous = wrapper("maps", "", &Map::new()).unwrap();
        assert!(!dom::has_attr(&anonymous, BLOCK_UID));
    }

    #[test]
    fn block_without_type_is_rejected() {
        let (result, _) = with_ctx(|ctx| encode_block(ctx, "x", &Block::default()));
        assert!(matches!(result, Err(ConvertError::InvalidBlock(_))));
    }

    #[test]
    fn dangling_layout_ids_are_skipped_with_a_warning() {
        let mut tree = BlockTree::from_pairs(vec![(
            "a".to_string(),
            Block::new("maps").with("url", "/m"),
        )]);
        tree.blocks_layout.items.push("ghost".to_string());

        let (html, diagnostics) = with_ctx(|ctx| blocks_to_html(ctx, &tree));
        let html = html.unwrap();
        assert!(html.contains(r#"data-block-uid="a""#));
        assert!(!html.contains("ghost"));
        assert!(diagnostics.has(DiagnosticKind::MissingBlock));
    }

    #[test]
    fn unknown_types_round_trip_through_the_generic_codec() {
        let block = Block::new("fancyWidget")
            .with("heading", "Hello")
            .with("size", 3);
        let tree = BlockTree::from_pairs(vec![("w".to_string(), block)]);

        let (result, diagnostics) = with_ctx(|ctx| {
            let html = blocks_to_html(ctx, &tree)?;
            annotated_html_to_content(ctx, &format!(r#"<div data-field="blocks">{html}</div>"#))
        });
        assert!(diagnostics.has(DiagnosticKind::UnknownBlockType));
        let content = result.unwrap();
        assert_eq!(content.get("blocks"), Some(&ContentField::Blocks(tree)));
    }

    #[test]
    fn content_fields() {
        let html = r#"<html><body>
            <div data-field="title">Page title</div>
            <div>ignored</div>
            <div data-field="blocks"><p>Loose text</p></div>
            </body></html>"#;
        let (content, _) = with_ctx(|ctx| annotated_html_to_content(ctx, html));
        let content = content.unwrap();
        assert_eq!(
            content.get("title"),
            Some(&ContentField::Text("Page title".to_string()))
        );
        let Some(ContentField::Blocks(tree)) = content.get("blocks") else {
            panic!("blocks field missing");
        };
        let (_, block) = tree.ordered()[0];
        assert_eq!(block.block_type(), Some("slate"));
        assert_eq!(block.get_str("plaintext"), Some("Loose text"));
        assert_eq!(content.len(), 2);
    }

    #[test]
    fn content_serializes_untagged() {
        let mut content = Content::new();
        content.insert("title".to_string(), ContentField::Text("T".to_string()));
        content.insert("blocks".to_string(), ContentField::Blocks(BlockTree::new()));
        assert_eq!(
            serde_json::to_value(&content).unwrap(),
            json!({"blocks": {"blocks": {}, "blocks_layout": {"items": []}}, "title": "T"})
        );
    }
}
