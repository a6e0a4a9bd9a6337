//! Rich-text block codecs
//!
//! The rich-text value is rendered with the AST serializer straight into the
//! wrapper element and parsed back with the deserializer, so the translation
//! tool sees ordinary paragraphs, lists and tables.

use crate::ast::{self, Node};
use crate::blocks::extract::plain_text;
use crate::blocks::Block;
use crate::codec::{read_block, wrapper, BlockCodec};
use crate::context::Context;
use crate::dom;
use crate::error::ConvertError;
use markup5ever_rcdom::Handle;
use serde_json::{Map, Value};

fn rich_text(block: &Block, field: &str) -> Result<Vec<Node>, ConvertError> {
    match block.get(field) {
        Some(value) => ast::from_value(value),
        None => Ok(Vec::new()),
    }
}

fn parse_children(ctx: &Context<'_>, element: &Handle) -> Result<Vec<Node>, ConvertError> {
    ctx.deserializer().from_nodes(&dom::children(element))
}

/// `slate`: `value` as markup, `plaintext` recomputed on the way back
pub struct SlateCodec;

impl BlockCodec for SlateCodec {
    fn name(&self) -> &str {
        "slate"
    }

    fn description(&self) -> &str {
        "Rich-text paragraph block"
    }

    fn encode(
        &self,
        id: &str,
        block: &Block,
        ctx: &mut Context<'_>,
    ) -> Result<Vec<Handle>, ConvertError> {
        let div = wrapper("slate", id, &block.residual(&["value", "plaintext"]))?;
        let value = rich_text(block, "value")?;
        if value.is_empty() {
            dom::append(&div, dom::create_element("p", &[]));
        } else {
            dom::append_all(&div, ctx.serializer().to_dom(&value)?);
        }
        Ok(vec![div])
    }

    fn decode(&self, fragment: &Handle, ctx: &mut Context<'_>) -> Result<Block, ConvertError> {
        let mut block = read_block(fragment)?;
        let value = parse_children(ctx, fragment)?;
        block.insert("plaintext", plain_text(ctx.settings(), &value));
        block.insert("value", ast::to_value(&value));
        Ok(block)
    }
}

/// Blocks keeping rich text in one named field (`quote`, `callout`, `item`)
pub struct SlateFieldCodec {
    name: &'static str,
    field: &'static str,
}

impl SlateFieldCodec {
    pub fn new(name: &'static str, field: &'static str) -> Self {
        SlateFieldCodec { name, field }
    }
}

impl BlockCodec for SlateFieldCodec {
    fn name(&self) -> &str {
        self.name
    }

    fn encode(
        &self,
        id: &str,
        block: &Block,
        ctx: &mut Context<'_>,
    ) -> Result<Vec<Handle>, ConvertError> {
        let block_type = block.block_type().unwrap_or(self.name);
        let div = wrapper(block_type, id, &block.residual(&[self.field]))?;
        dom::append_all(&div, ctx.serializer().to_dom(&rich_text(block, self.field)?)?);
        Ok(vec![div])
    }

    fn decode(&self, fragment: &Handle, ctx: &mut Context<'_>) -> Result<Block, ConvertError> {
        let mut block = read_block(fragment)?;
        let value = parse_children(ctx, fragment)?;
        block.insert(self.field, ast::to_value(&value));
        Ok(block)
    }
}

/// `slateTable`: a real `<table>`
///
/// Cell types map onto `th`/`td`. The residual keeps a skeleton of the rows
/// (keys and any extra row or cell fields) so they survive the trip; the
/// cell values travel as markup.
pub struct TableCodec;

const CELL_CONTENT: &[&str] = &["value", "type"];

fn object_without(value: &Value, keys: &[&str]) -> Map<String, Value> {
    value
        .as_object()
        .map(|map| {
            map.iter()
                .filter(|(key, _)| !keys.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default()
}

fn rows_of(table: &Value) -> &[Value] {
    table
        .get("rows")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn cells_of(row: &Value) -> &[Value] {
    row.get("cells")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

impl TableCodec {
    fn skeleton(table: &Value) -> Map<String, Value> {
        let rows = rows_of(table)
            .iter()
            .map(|row| {
                let mut skeleton = object_without(row, &["cells"]);
                let cells = cells_of(row)
                    .iter()
                    .map(|cell| Value::Object(object_without(cell, CELL_CONTENT)))
                    .collect();
                skeleton.insert("cells".to_string(), Value::Array(cells));
                Value::Object(skeleton)
            })
            .collect();
        let mut out = object_without(table, &["rows"]);
        out.insert("rows".to_string(), Value::Array(rows));
        out
    }
}

impl BlockCodec for TableCodec {
    fn name(&self) -> &str {
        "slateTable"
    }

    fn description(&self) -> &str {
        "Rich-text table"
    }

    fn encode(
        &self,
        id: &str,
        block: &Block,
        ctx: &mut Context<'_>,
    ) -> Result<Vec<Handle>, ConvertError> {
        let table = block.get("table").cloned().unwrap_or(Value::Null);
        let mut residual = block.residual(&["table", "plaintext"]);
        residual.insert("table".to_string(), Value::Object(Self::skeleton(&table)));
        let div = wrapper("slateTable", id, &residual)?;

        let element = dom::create_element("table", &[]);
        let serializer = ctx.serializer();
        for row in rows_of(&table) {
            let tr = dom::create_element("tr", &[]);
            for cell in cells_of(row) {
                let tag = match cell.get("type").and_then(Value::as_str) {
                    Some("header") => "th",
                    _ => "td",
                };
                let td = dom::create_element(tag, &[]);
                if let Some(value) = cell.get("value") {
                    dom::append_all(&td, serializer.to_dom(&ast::from_value(value)?)?);
                }
                dom::append(&tr, td);
            }
            dom::append(&element, tr);
        }
        dom::append(&div, element);
        Ok(vec![div])
    }

    fn decode(&self, fragment: &Handle, ctx: &mut Context<'_>) -> Result<Block, ConvertError> {
        let mut block = read_block(fragment)?;
        let mut table = match block.remove("table") {
            Some(Value::Object(map)) => map,
            Some(_) | None => Map::new(),
        };
        let skeleton = match table.remove("rows") {
            Some(Value::Array(rows)) => rows,
            _ => Vec::new(),
        };

        let deserializer = ctx.deserializer();
        let mut rows = Vec::new();
        for (i, tr) in dom::find_all(fragment, |n| dom::is_tag(n, "tr")).iter().enumerate() {
            let row_skeleton = skeleton.get(i).cloned().unwrap_or(Value::Null);
            let mut row = object_without(&row_skeleton, &["cells"]);
            if !row.contains_key("key") {
                row.insert("key".to_string(), Value::String(ctx.fresh_id()));
            }

            let cell_skeletons = cells_of(&row_skeleton);
            let mut cells = Vec::new();
            for (j, td) in dom::element_children(tr).iter().enumerate() {
                let cell_type = match dom::tag_name(td) {
                    Some("th") => "header",
                    Some("td") => "data",
                    other => {
                        return Err(ConvertError::InvalidTableCell(
                            other.unwrap_or_default().to_string(),
                        ))
                    }
                };
                let mut cell = cell_skeletons
                    .get(j)
                    .map(|c| object_without(c, CELL_CONTENT))
                    .unwrap_or_default();
                if !cell.contains_key("key") {
                    cell.insert("key".to_string(), Value::String(ctx.fresh_id()));
                }
                cell.insert("type".to_string(), Value::String(cell_type.to_string()));
                let value = deserializer.from_nodes(&dom::children(td))?;
                cell.insert("value".to_string(), ast::to_value(&value));
                cells.push(Value::Object(cell));
            }
            row.insert("cells".to_string(), Value::Array(cells));
            rows.push(Value::Object(row));
        }
        table.insert("rows".to_string(), Value::Array(rows));

        let plaintext = dom::find_first(fragment, |n| dom::is_tag(n, "table"))
            .map(|t| dom::text_content(&t))
            .unwrap_or_default();
        block.insert("table", Value::Object(table));
        block.insert("plaintext", plaintext);
        Ok(block)
    }
}
