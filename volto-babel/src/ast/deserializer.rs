//! HTML → rich-text AST
//!
//! Each DOM node is converted by a tag handler picked from a fixed table.
//! Tags without a handler become a generic element when they are accepted
//! and are otherwise transparent: their children are spliced into the
//! parent. Any tag carrying a `data-slate-data` stub is restored from it,
//! whatever the tag is.

use super::normalize::normalize;
use super::whitespace::collapse_inline_space;
use super::{ElementNode, Node, TextNode};
use crate::dom;
use crate::error::ConvertError;
use crate::markers::{PLACEHOLDER_DATA, PLACEHOLDER_TAG, SLATE_DATA, SLATE_NODE};
use crate::settings::{Settings, LINK_TYPE};
use markup5ever_rcdom::{Handle, NodeData};
use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::collections::HashMap;

type TagHandler = fn(&HtmlDeserializer<'_>, &Handle) -> Result<Vec<Node>, ConvertError>;

static TAG_HANDLERS: Lazy<HashMap<&'static str, TagHandler>> = Lazy::new(|| {
    let mut handlers: HashMap<&'static str, TagHandler> = HashMap::new();
    handlers.insert("a", handle_link);
    handlers.insert("b", handle_block);
    handlers.insert("br", handle_break);
    handlers.insert("div", handle_div);
    handlers.insert("img", handle_image);
    handlers.insert("ol", handle_list);
    handlers.insert("p", handle_paragraph);
    handlers.insert("span", handle_span);
    handlers.insert("ul", handle_list);
    handlers.insert(PLACEHOLDER_TAG, handle_placeholder);
    handlers
});

/// HTML attributes that would clash with the node's own keys.
const RESERVED_FIELDS: &[&str] = &["type", "value", "children", "text"];

/// Converts HTML into rich-text nodes
pub struct HtmlDeserializer<'s> {
    settings: &'s Settings,
}

impl<'s> HtmlDeserializer<'s> {
    pub fn new(settings: &'s Settings) -> Self {
        HtmlDeserializer { settings }
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    /// Parse an HTML document or fragment into a normalized value.
    pub fn from_html(&self, html: &str) -> Result<Vec<Node>, ConvertError> {
        let dom = dom::parse(html);
        match dom::body(&dom) {
            Some(body) => self.from_nodes(&dom::children(&body)),
            None => Ok(Vec::new()),
        }
    }

    /// Convert sibling DOM nodes into a normalized value.
    pub fn from_nodes(&self, nodes: &[Handle]) -> Result<Vec<Node>, ConvertError> {
        let mut out = Vec::new();
        for node in nodes {
            out.extend(self.deserialize(node)?);
        }
        Ok(normalize(self.settings, out))
    }

    /// Convert one DOM node. May yield zero, one or several AST nodes.
    pub fn deserialize(&self, node: &Handle) -> Result<Vec<Node>, ConvertError> {
        match &node.data {
            NodeData::Text { .. } => {
                let text = collapse_inline_space(node, self.settings);
                if text.is_empty() {
                    Ok(Vec::new())
                } else {
                    Ok(vec![Node::text(text)])
                }
            }
            NodeData::Element { name, .. } => {
                let tag: &str = &name.local;
                if dom::has_attr(node, SLATE_DATA) {
                    return handle_restore(self, node);
                }
                if let Some(handler) = TAG_HANDLERS.get(tag) {
                    return handler(self, node);
                }
                if self.settings.is_accepted_tag(tag) {
                    return handle_block(self, node);
                }
                handle_fallback(self, node)
            }
            _ => Ok(Vec::new()),
        }
    }

    pub fn deserialize_children(&self, node: &Handle) -> Result<Vec<Node>, ConvertError> {
        let mut out = Vec::new();
        for child in dom::children(node) {
            out.extend(self.deserialize(&child)?);
        }
        Ok(out)
    }
}

fn parse_json_attr(node: &Handle, attribute: &str) -> Result<Option<Value>, ConvertError> {
    match dom::attr(node, attribute) {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| ConvertError::invalid_json(attribute, e)),
        None => Ok(None),
    }
}

fn parse_json_object(node: &Handle, attribute: &str) -> Result<Map<String, Value>, ConvertError> {
    match parse_json_attr(node, attribute)? {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(ConvertError::InvalidJson {
            attribute: attribute.to_string(),
            message: "expected a JSON object".to_string(),
        }),
        None => Ok(Map::new()),
    }
}

/// Rebuild an element from its stub; the tag decides the type if the stub does not.
fn handle_restore(de: &HtmlDeserializer<'_>, node: &Handle) -> Result<Vec<Node>, ConvertError> {
    let mut stub = parse_json_object(node, SLATE_DATA)?;
    let kind = match stub.remove("type") {
        Some(Value::String(kind)) => kind,
        _ => match dom::tag_name(node) {
            Some("a") => LINK_TYPE.to_string(),
            Some(tag) => tag.to_string(),
            None => de.settings.default_block_type.clone(),
        },
    };
    stub.remove("children");
    Ok(vec![Node::Element(ElementNode {
        kind,
        children: de.deserialize_children(node)?,
        fields: stub,
    })])
}

fn handle_fallback(de: &HtmlDeserializer<'_>, node: &Handle) -> Result<Vec<Node>, ConvertError> {
    de.deserialize_children(node)
}

/// Generic element: tag as type, HTML attributes copied as string fields.
fn handle_block(de: &HtmlDeserializer<'_>, node: &Handle) -> Result<Vec<Node>, ConvertError> {
    let tag = dom::tag_name(node).unwrap_or_default().to_string();
    let mut element = ElementNode::new(tag, de.deserialize_children(node)?);
    for (name, value) in dom::attrs(node) {
        let key = if RESERVED_FIELDS.contains(&name.as_str()) {
            format!("_{name}")
        } else {
            name
        };
        element.fields.insert(key, Value::String(value));
    }
    Ok(vec![Node::Element(element)])
}

fn handle_link(de: &HtmlDeserializer<'_>, node: &Handle) -> Result<Vec<Node>, ConvertError> {
    let mut element = ElementNode::new(LINK_TYPE, de.deserialize_children(node)?);
    if let Some(href) = dom::attr(node, "href") {
        element = element.with_field("data", serde_json::json!({ "url": href }));
    }
    Ok(vec![Node::Element(element)])
}

fn handle_break(_de: &HtmlDeserializer<'_>, _node: &Handle) -> Result<Vec<Node>, ConvertError> {
    Ok(vec![Node::text("\n")])
}

fn handle_list(de: &HtmlDeserializer<'_>, node: &Handle) -> Result<Vec<Node>, ConvertError> {
    let children = de.deserialize_children(node)?;
    if children.is_empty() {
        return Ok(vec![Node::element(
            de.settings.default_block_type.clone(),
            vec![Node::text("")],
        )]);
    }
    let tag = dom::tag_name(node).unwrap_or("ul").to_string();
    Ok(vec![Node::element(tag, children)])
}

fn handle_paragraph(de: &HtmlDeserializer<'_>, node: &Handle) -> Result<Vec<Node>, ConvertError> {
    let centered = dom::attr(node, "style")
        .map(|style| style_to_object(&style))
        .is_some_and(|style| {
            style
                .iter()
                .any(|(key, value)| key == "text-align" && value == "center")
        });
    if centered {
        let element =
            ElementNode::new("p", de.deserialize_children(node)?).with_field("styleName", "text-center");
        return Ok(vec![Node::Element(element)]);
    }
    handle_block(de, node)
}

fn handle_div(de: &HtmlDeserializer<'_>, node: &Handle) -> Result<Vec<Node>, ConvertError> {
    if !dom::has_attr(node, SLATE_NODE) {
        return handle_fallback(de, node);
    }
    let mut stub = parse_json_object(node, SLATE_NODE)?;
    let kind = match stub.remove("type") {
        Some(Value::String(kind)) => kind,
        _ => de.settings.default_block_type.clone(),
    };
    stub.remove("children");
    Ok(vec![Node::Element(ElementNode {
        kind,
        children: de.deserialize_children(node)?,
        fields: stub,
    })])
}

/// A span stub restores a marked text leaf; plain spans are transparent.
fn handle_span(de: &HtmlDeserializer<'_>, node: &Handle) -> Result<Vec<Node>, ConvertError> {
    if !dom::has_attr(node, SLATE_NODE) {
        return handle_fallback(de, node);
    }
    let mut marks = parse_json_object(node, SLATE_NODE)?;
    marks.remove("text");
    Ok(vec![Node::Text(TextNode {
        text: dom::text_content(node),
        marks,
    })])
}

fn handle_placeholder(_de: &HtmlDeserializer<'_>, node: &Handle) -> Result<Vec<Node>, ConvertError> {
    let data = parse_json_attr(node, PLACEHOLDER_DATA)?.unwrap_or_else(|| Value::Object(Map::new()));
    let element = ElementNode::new(PLACEHOLDER_TAG, Vec::new()).with_field("data", data);
    Ok(vec![Node::Element(element)])
}

fn handle_image(_de: &HtmlDeserializer<'_>, node: &Handle) -> Result<Vec<Node>, ConvertError> {
    let src = dom::attr(node, "src").unwrap_or_default();
    let style = dom::attr(node, "style")
        .map(|s| style_to_object(&s))
        .unwrap_or_default();
    let align = style
        .iter()
        .find(|(key, _)| key == "float")
        .map(|(_, value)| match value.as_str() {
            "left" | "right" => value.clone(),
            _ => String::new(),
        })
        .unwrap_or_default();

    let (url, scale) = fix_img_url(&src);
    let element = ElementNode::new("img", vec![Node::text("")])
        .with_field("align", align)
        .with_field("url", url)
        .with_field("title", dom::attr(node, "title").unwrap_or_default())
        .with_field("alt", dom::attr(node, "alt").unwrap_or_default())
        .with_field("scale", scale.map(Value::String).unwrap_or(Value::Null));
    Ok(vec![Node::Element(element)])
}

/// Split a Plone image url into its base and scale name.
///
/// `/photo.jpg/@@images/image/large` → (`/photo.jpg`, `Some("huge")`).
/// Relative `resolveuid` urls are rebased one level up, as the rich-text
/// lives one level below the page.
pub fn fix_img_url(url: &str) -> (String, Option<String>) {
    let (base, scale) = match url.split_once("/@@images") {
        Some((base, rest)) => {
            let scale = rest.rsplit('/').next().unwrap_or_default();
            let scale = if scale == "large" { "huge" } else { scale };
            (base, Some(scale.to_string()))
        }
        None => (url, None),
    };

    let base = match base.split_once("resolveuid") {
        Some((_, rest)) if !base.starts_with('/') => format!("../resolveuid{rest}"),
        _ => base.to_string(),
    };
    (base, scale)
}

/// Parse an inline `style` attribute into key/value pairs.
pub fn style_to_object(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}
