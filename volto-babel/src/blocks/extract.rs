//! Rich-text value → blocks
//!
//! Every top-level node becomes one or more blocks. A node (or the first
//! matching descendant) that is a placeholder, a table, a lone image or a
//! video becomes the matching structured block; anything else stays rich
//! text wrapped in a `slate` block.

use super::{Block, BlockTree};
use crate::ast::{self, normalize::normalize, ElementNode, Node};
use crate::context::Context;
use crate::dom;
use crate::error::ConvertError;
use crate::markers::PLACEHOLDER_TAG;
use crate::settings::{Settings, LINK_TYPE};
use serde_json::{json, Value};

const GRID_SIZE: usize = 12;

/// A recognised node: one block, or a run of blocks with their own ids
enum Extracted {
    One(Block),
    Many(Vec<(String, Block)>),
}

impl Extracted {
    fn into_pairs(self, ctx: &Context<'_>) -> Vec<(String, Block)> {
        match self {
            Extracted::One(block) => vec![(ctx.fresh_id(), block)],
            Extracted::Many(pairs) => pairs,
        }
    }
}

/// Convert a rich-text value into `(id, block)` pairs in document order.
pub fn ast_to_blocks(
    ctx: &mut Context<'_>,
    nodes: &[Node],
) -> Result<Vec<(String, Block)>, ConvertError> {
    let mut out = Vec::new();
    for node in nodes {
        out.extend(convert_node(ctx, node)?);
    }
    Ok(out)
}

/// Rendered text of a value; empty when it cannot be rendered.
pub fn plain_text(settings: &Settings, nodes: &[Node]) -> String {
    match ast::HtmlSerializer::new(settings).to_dom(nodes) {
        Ok(handles) => handles.iter().map(dom::text_content).collect(),
        Err(err) => {
            tracing::debug!(%err, "plain text extraction failed");
            String::new()
        }
    }
}

fn convert_node(ctx: &mut Context<'_>, node: &Node) -> Result<Vec<(String, Block)>, ConvertError> {
    let plaintext = plain_text(ctx.settings(), std::slice::from_ref(node));

    if let Some(found) = match_node(ctx, node, &plaintext, None, true)? {
        return Ok(found.into_pairs(ctx));
    }

    if let Node::Element(element) = node {
        // Depth first, last child first: the first match wins.
        let mut worklist: Vec<(&Node, Option<&ElementNode>)> =
            element.children.iter().map(|child| (child, None)).collect();
        while let Some((child, parent)) = worklist.pop() {
            if let Some(found) = match_node(ctx, child, &plaintext, parent, false)? {
                return Ok(found.into_pairs(ctx));
            }
            if let Node::Element(inner) = child {
                worklist.extend(inner.children.iter().map(|c| (c, Some(inner))));
            }
        }
    }

    let block = rich_text_block(ctx.settings(), node, plaintext);
    Ok(vec![(ctx.fresh_id(), block)])
}

fn match_node(
    ctx: &mut Context<'_>,
    node: &Node,
    plaintext: &str,
    parent: Option<&ElementNode>,
    is_root: bool,
) -> Result<Option<Extracted>, ConvertError> {
    let Node::Element(element) = node else {
        return Ok(None);
    };

    let found = match element.kind.as_str() {
        PLACEHOLDER_TAG => element
            .field("data")
            .and_then(Block::from_value)
            .filter(|block| !block.as_map().is_empty())
            .map(Extracted::One),
        "table" if contains_placeholder(element) => {
            let columns = table_to_columns(ctx, element)?;
            (!columns.is_empty()).then_some(Extracted::Many(columns))
        }
        "table" => Some(Extracted::One(table_block(ctx, element, plaintext))),
        "img" if is_root || plaintext.is_empty() => Some(Extracted::One(image_block(element, parent))),
        "video" => Some(Extracted::One(video_block(element))),
        _ => None,
    };
    Ok(found)
}

fn contains_placeholder(element: &ElementNode) -> bool {
    element.children.iter().any(|child| match child {
        Node::Element(inner) => inner.kind == PLACEHOLDER_TAG || contains_placeholder(inner),
        Node::Text(_) => false,
    })
}

fn element_children(element: &ElementNode) -> impl Iterator<Item = &ElementNode> {
    element.children.iter().filter_map(Node::as_element)
}

/// A layout table holding widgets: each row becomes a columns block.
fn table_to_columns(
    ctx: &mut Context<'_>,
    table: &ElementNode,
) -> Result<Vec<(String, Block)>, ConvertError> {
    let mut out = Vec::new();
    for child in element_children(table) {
        match child.kind.as_str() {
            "tbody" => {
                for row in element_children(child) {
                    out.extend(row_to_columns(ctx, row)?);
                }
            }
            "tr" => out.extend(row_to_columns(ctx, child)?),
            _ => {}
        }
    }
    Ok(out)
}

fn row_to_columns(
    ctx: &mut Context<'_>,
    row: &ElementNode,
) -> Result<Option<(String, Block)>, ConvertError> {
    let cells: Vec<&ElementNode> = element_children(row).collect();
    if cells.is_empty() {
        return Ok(None);
    }

    let span = GRID_SIZE / cells.len();
    let width = ctx
        .settings()
        .column_width(span)
        .ok_or(ConvertError::MissingColumnWidth(span))?
        .to_string();

    let mut columns = BlockTree::new();
    for cell in &cells {
        let blocks = ctx.nested(|ctx| ast_to_blocks(ctx, &cell.children))?;
        let column = BlockTree::from_pairs(blocks).to_map();
        columns.push(ctx.fresh_id(), Block::from_map(column));
    }

    let block = Block::new("columnsBlock")
        .with("data", columns.to_value())
        .with("gridSize", GRID_SIZE)
        .with("gridCols", vec![Value::String(width); cells.len()]);
    Ok(Some((ctx.fresh_id(), block)))
}

/// A data table: rich-text cells, header rows from `thead`.
fn table_block(ctx: &Context<'_>, table: &ElementNode, plaintext: &str) -> Block {
    let mut rows = Vec::new();
    for child in element_children(table) {
        let (cell_type, section_rows): (&str, Vec<&ElementNode>) = match child.kind.as_str() {
            "thead" => ("header", element_children(child).collect()),
            "tbody" | "tfoot" => ("data", element_children(child).collect()),
            "tr" => ("data", vec![child]),
            _ => continue,
        };
        for row in section_rows {
            let cells: Vec<Value> = element_children(row)
                .map(|cell| {
                    let value = normalize(ctx.settings(), cell.children.clone());
                    json!({
                        "key": ctx.fresh_id(),
                        "type": cell_type,
                        "value": ast::to_value(&value),
                    })
                })
                .collect();
            rows.push(json!({ "key": ctx.fresh_id(), "cells": cells }));
        }
    }

    let mut table_data = serde_json::Map::new();
    table_data.insert("rows".to_string(), Value::Array(rows));
    if table
        .field_str("class")
        .is_some_and(|class| class.contains("listing"))
    {
        table_data.insert("striped".to_string(), Value::Bool(true));
    }

    Block::new("slateTable")
        .with("table", Value::Object(table_data))
        .with("plaintext", plaintext)
}

fn image_block(image: &ElementNode, parent: Option<&ElementNode>) -> Block {
    let url = image.field_str("url").unwrap_or_default();
    let url = url.split("/@@images").next().unwrap_or_default();
    let mut block = Block::new("image")
        .with("url", url)
        .with("align", image.field_str("align").unwrap_or_default())
        .with("title", image.field_str("title").unwrap_or_default())
        .with("alt", image.field_str("alt").unwrap_or_default());

    if let Some(link) = parent.filter(|p| p.kind == LINK_TYPE) {
        let mut href = link
            .field("data")
            .and_then(|data| data.get("url"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if href.starts_with("resolveuid") {
            href = format!("../{href}");
        }
        if href.contains("resolveuid") {
            block.insert("href", json!([{ "@id": href }]));
        } else {
            block.insert("href", href);
        }
    }
    block
}

/// `url`, `title` and `alt` are always present, empty when the tag lacks them.
fn video_block(video: &ElementNode) -> Block {
    let mut block = Block::new("nextCloudVideo");
    for (field, key) in [("src", "url"), ("data-matomo-title", "title"), ("alt", "alt")] {
        block.insert(key, video.field_str(field).unwrap_or_default());
    }
    block
}

/// Rich-text fallback. Roots that may not stand alone are wrapped in the
/// default block; inline elements keep empty text on both sides.
fn rich_text_block(settings: &Settings, node: &Node, plaintext: String) -> Block {
    let value = match node {
        Node::Element(element) if settings.is_toplevel_type(&element.kind) => node.clone(),
        Node::Element(_) => Node::element(
            settings.default_block_type.clone(),
            vec![Node::text(""), node.clone(), Node::text("")],
        ),
        Node::Text(_) => Node::element(settings.default_block_type.clone(), vec![node.clone()]),
    };
    Block::new("slate")
        .with("value", ast::to_value(std::slice::from_ref(&value)))
        .with("plaintext", plaintext)
}
