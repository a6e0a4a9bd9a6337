//! Conversion commands
//!
//! Each command maps to one library entry point and reads/writes text:
//!
//! - `html2slate`:   authored HTML → Slate JSON (an array of nodes)
//! - `slate2html`:   Slate JSON → HTML
//! - `toblocks`:     authored HTML → `{blocks, blocks_layout}` JSON
//! - `blocks2html`:  `{blocks, blocks_layout}` JSON → annotated HTML
//! - `html2content`: annotated HTML → content fields JSON
//!
//! JSON inputs may also be wrapped in an object under `data`, the shape the
//! conversion service used in its requests.

use serde_json::Value;
use volto_babel::{ast, BlockTree, Converter, Diagnostics};

/// All available commands with their one-line description
pub const AVAILABLE_COMMANDS: &[(&str, &str)] = &[
    ("html2slate", "Convert HTML into Slate rich-text JSON"),
    ("slate2html", "Render Slate rich-text JSON as HTML"),
    ("toblocks", "Convert authored HTML into a Volto block tree"),
    ("blocks2html", "Render a Volto block tree as annotated HTML"),
    ("html2content", "Read annotated HTML back into content fields"),
];

/// Run `command` over `source`.
///
/// # Returns
///
/// The command output, or an error message ready to print.
pub fn execute(
    converter: &Converter,
    command: &str,
    source: &str,
    pretty: bool,
    diagnostics: &mut Diagnostics,
) -> Result<String, String> {
    match command {
        "html2slate" => {
            let nodes = converter.html_to_ast(source).map_err(|e| e.to_string())?;
            to_json(&nodes, pretty)
        }
        "slate2html" => {
            let value = parse_json(source)?;
            let nodes = ast::from_value(unwrap_data(&value)).map_err(|e| e.to_string())?;
            converter.ast_to_html(&nodes).map_err(|e| e.to_string())
        }
        "toblocks" => {
            let tree = converter
                .html_to_blocks(source, diagnostics)
                .map_err(|e| e.to_string())?;
            to_json(&tree, pretty)
        }
        "blocks2html" => {
            let value = parse_json(source)?;
            let tree = block_tree(unwrap_data(&value))?;
            converter
                .blocks_to_html(&tree, diagnostics)
                .map_err(|e| e.to_string())
        }
        "html2content" => {
            let content = converter
                .annotated_html_to_content(source, diagnostics)
                .map_err(|e| e.to_string())?;
            to_json(&content, pretty)
        }
        other => Err(format!("Unknown command '{other}'")),
    }
}

fn parse_json(source: &str) -> Result<Value, String> {
    serde_json::from_str(source).map_err(|e| format!("Invalid JSON input: {e}"))
}

fn unwrap_data(value: &Value) -> &Value {
    match value.get("data") {
        Some(inner) if !value.as_object().is_some_and(|map| map.contains_key("blocks")) => inner,
        _ => value,
    }
}

fn block_tree(value: &Value) -> Result<BlockTree, String> {
    if !value.is_object() || value.get("blocks").is_none() {
        return Err("Expected an object with 'blocks' and 'blocks_layout'".to_string());
    }
    Ok(BlockTree::from_value(value))
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    text.map_err(|e| format!("Serialization error: {e}"))
}
