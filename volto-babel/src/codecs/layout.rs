//! Codecs for blocks that nest block trees
//!
//! Columns, tabs and accordions keep their columns in `data` as a tree whose
//! entries are themselves trees. Groups and heroes keep one tree in `data`,
//! grids keep it at the top level of the payload. Nested blocks are encoded
//! with the same registry, one nesting level deeper.

use crate::blocks::preprocess::{hero_payload, merge_into_data, HERO_FIELDS};
use crate::blocks::{Block, BlockTree, TREE_KEYS};
use crate::codec::{
    decode_tree, element_id, encode_tree, field_div, read_block, read_fields, to_json, wrapper,
    BlockCodec,
};
use crate::context::Context;
use crate::diagnostics::DiagnosticKind;
use crate::dom;
use crate::error::ConvertError;
use crate::markers::{BLOCK_UID, COLUMN_DATA, COLUMN_META, SECTION};
use markup5ever_rcdom::Handle;
use serde_json::{Map, Value};

/// Split a payload into its residual and the tree kept in `data`.
///
/// Keys of `data` other than the tree stay in the residual.
fn split_data(block: &Block, consumed: &[&str]) -> (Map<String, Value>, BlockTree) {
    let Some(data) = block.get("data").and_then(Value::as_object) else {
        return (block.residual(consumed), BlockTree::new());
    };

    let mut keys = consumed.to_vec();
    keys.push("data");
    let mut residual = block.residual(&keys);
    let rest: Map<String, Value> = data
        .iter()
        .filter(|(key, _)| !TREE_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    if !rest.is_empty() {
        residual.insert("data".to_string(), Value::Object(rest));
    }
    (residual, BlockTree::from_map(data))
}

fn extend_with_tree(block: &mut Block, tree: BlockTree) {
    for (key, value) in tree.to_map() {
        block.insert(&key, value);
    }
}

/// The columns of a layout block, skipping (and reporting) dangling ids.
fn columns<'b>(ctx: &mut Context<'_>, tree: &'b BlockTree) -> Vec<(&'b str, &'b Block)> {
    let mut out = Vec::new();
    for (id, column) in tree.iter() {
        match column {
            Some(column) => out.push((id, column)),
            None => ctx.warn(
                DiagnosticKind::MissingBlock,
                format!("column layout lists '{id}' but there is no such column"),
            ),
        }
    }
    out
}

/// `columnsBlock`: one `<div data-volto-column-data>` per column
pub struct ColumnsCodec;

impl BlockCodec for ColumnsCodec {
    fn name(&self) -> &str {
        "columnsBlock"
    }

    fn encode(
        &self,
        id: &str,
        block: &Block,
        ctx: &mut Context<'_>,
    ) -> Result<Vec<Handle>, ConvertError> {
        let (residual, tree) = split_data(block, &[]);
        let div = wrapper("columnsBlock", id, &residual)?;
        for (column_id, column) in columns(ctx, &tree) {
            let settings = to_json(&column.without(TREE_KEYS))?;
            let element = dom::create_element(
                "div",
                &[(BLOCK_UID, column_id), (COLUMN_DATA, settings.as_str())],
            );
            dom::append_all(&element, encode_tree(ctx, &column.nested_tree())?);
            dom::append(&div, element);
        }
        Ok(vec![div])
    }

    fn decode(&self, fragment: &Handle, ctx: &mut Context<'_>) -> Result<Block, ConvertError> {
        let mut block = read_block(fragment)?;
        let mut tree = BlockTree::new();
        for element in dom::element_children(fragment) {
            let mut column = Block::from_map(dom::json_object_attr(&element, COLUMN_DATA)?);
            extend_with_tree(&mut column, decode_tree(ctx, &dom::children(&element))?);
            tree.push(element_id(ctx, &element), column);
        }
        merge_into_data(&mut block, tree);
        Ok(block)
    }
}

/// Tabs and accordions: columns with a translatable title
///
/// Each column starts with a `<div data-volto-column>` holding the column
/// settings and the title field, followed by the column's blocks.
pub struct TitledColumnsCodec {
    name: &'static str,
}

impl TitledColumnsCodec {
    pub fn new(name: &'static str) -> Self {
        TitledColumnsCodec { name }
    }
}

const TITLE: &str = "title";

impl BlockCodec for TitledColumnsCodec {
    fn name(&self) -> &str {
        self.name
    }

    fn encode(
        &self,
        id: &str,
        block: &Block,
        ctx: &mut Context<'_>,
    ) -> Result<Vec<Handle>, ConvertError> {
        let (residual, tree) = split_data(block, &[]);
        let block_type = block.block_type().unwrap_or(self.name);
        let div = wrapper(block_type, id, &residual)?;

        for (column_id, column) in columns(ctx, &tree) {
            let title = column.get_str(TITLE);
            let mut hidden = TREE_KEYS.to_vec();
            if title.is_some() {
                hidden.push(TITLE);
            }
            let meta_json = to_json(&column.without(&hidden))?;
            let meta = dom::create_element("div", &[(COLUMN_META, meta_json.as_str())]);
            if let Some(title) = title {
                dom::append(&meta, field_div(TITLE, title));
            }

            let element = dom::create_element("div", &[(BLOCK_UID, column_id)]);
            dom::append(&element, meta);
            dom::append_all(&element, encode_tree(ctx, &column.nested_tree())?);
            dom::append(&div, element);
        }
        Ok(vec![div])
    }

    fn decode(&self, fragment: &Handle, ctx: &mut Context<'_>) -> Result<Block, ConvertError> {
        let mut block = read_block(fragment)?;
        let mut tree = BlockTree::new();
        for element in dom::element_children(fragment) {
            let mut content = dom::element_children(&element);
            let mut column = Block::default();
            if content
                .first()
                .is_some_and(|first| dom::has_attr(first, COLUMN_META))
            {
                let meta = content.remove(0);
                column = Block::from_map(dom::json_object_attr(&meta, COLUMN_META)?);
                for (name, text) in read_fields(&meta) {
                    column.insert(&name, text);
                }
            }
            extend_with_tree(&mut column, decode_tree(ctx, &content)?);
            tree.push(element_id(ctx, &element), column);
        }
        merge_into_data(&mut block, tree);
        Ok(block)
    }
}

/// `group`: the nested blocks directly inside the wrapper
pub struct GroupCodec;

impl BlockCodec for GroupCodec {
    fn name(&self) -> &str {
        "group"
    }

    fn encode(
        &self,
        id: &str,
        block: &Block,
        ctx: &mut Context<'_>,
    ) -> Result<Vec<Handle>, ConvertError> {
        let (residual, tree) = split_data(block, &[]);
        let div = wrapper("group", id, &residual)?;
        dom::append_all(&div, encode_tree(ctx, &tree)?);
        Ok(vec![div])
    }

    fn decode(&self, fragment: &Handle, ctx: &mut Context<'_>) -> Result<Block, ConvertError> {
        let mut block = read_block(fragment)?;
        let tree = decode_tree(ctx, &dom::children(fragment))?;
        merge_into_data(&mut block, tree);
        Ok(block)
    }
}

/// `gridBlock`: like a group, but the tree sits at the payload's top level
pub struct GridCodec;

impl BlockCodec for GridCodec {
    fn name(&self) -> &str {
        "gridBlock"
    }

    fn encode(
        &self,
        id: &str,
        block: &Block,
        ctx: &mut Context<'_>,
    ) -> Result<Vec<Handle>, ConvertError> {
        let div = wrapper("gridBlock", id, &block.residual(TREE_KEYS))?;
        dom::append_all(&div, encode_tree(ctx, &block.nested_tree())?);
        Ok(vec![div])
    }

    fn decode(&self, fragment: &Handle, ctx: &mut Context<'_>) -> Result<Block, ConvertError> {
        let mut block = read_block(fragment)?;
        let tree = decode_tree(ctx, &dom::children(fragment))?;
        extend_with_tree(&mut block, tree);
        Ok(block)
    }
}

/// `hero`: button label and copyright as text, nested blocks in a section
pub struct HeroCodec;

impl BlockCodec for HeroCodec {
    fn name(&self) -> &str {
        "hero"
    }

    fn encode(
        &self,
        id: &str,
        block: &Block,
        ctx: &mut Context<'_>,
    ) -> Result<Vec<Handle>, ConvertError> {
        let fields: Vec<(&str, &str)> = HERO_FIELDS
            .iter()
            .filter_map(|name| block.get_str(name).map(|text| (*name, text)))
            .collect();
        let consumed: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
        let has_blocks = block
            .get("data")
            .is_some_and(|data| data.get("blocks").is_some());
        let (residual, tree) = split_data(block, &consumed);

        let div = wrapper("hero", id, &residual)?;
        dom::append_all(&div, fields.iter().map(|(name, text)| field_div(name, text)));
        if has_blocks {
            let section = dom::create_element("div", &[(SECTION, "blocks")]);
            dom::append_all(&section, encode_tree(ctx, &tree)?);
            dom::append(&div, section);
        }
        Ok(vec![div])
    }

    fn decode(&self, fragment: &Handle, ctx: &mut Context<'_>) -> Result<Block, ConvertError> {
        let mut block = hero_payload(fragment)?;
        let section = dom::element_children(fragment)
            .into_iter()
            .find(|child| dom::attr(child, SECTION).as_deref() == Some("blocks"));
        if let Some(section) = section {
            let tree = decode_tree(ctx, &dom::children(&section))?;
            merge_into_data(&mut block, tree);
        }
        Ok(block)
    }
}
