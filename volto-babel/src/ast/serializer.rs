//! Rich-text AST → HTML
//!
//! The output is plain, translatable HTML. Whatever cannot be expressed with
//! ordinary tags and attributes travels in JSON stubs (`data-slate-node`,
//! `data-slate-data`) so [`super::HtmlDeserializer`] can rebuild the exact
//! node.

use super::{ElementNode, Node, TextNode};
use crate::dom;
use crate::error::ConvertError;
use crate::markers::{PLACEHOLDER_TAG, SLATE_DATA, SLATE_NODE};
use crate::settings::{Settings, LINK_TYPE};
use markup5ever_rcdom::Handle;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::collections::HashMap;

type ElementHandler = fn(&HtmlSerializer<'_>, &ElementNode) -> Result<Vec<Handle>, ConvertError>;

static ELEMENT_HANDLERS: Lazy<HashMap<&'static str, ElementHandler>> = Lazy::new(|| {
    let mut handlers: HashMap<&'static str, ElementHandler> = HashMap::new();
    handlers.insert("img", handle_image);
    handlers.insert(LINK_TYPE, handle_link);
    handlers.insert("p", handle_paragraph);
    handlers
});

const VOID_TAGS: &[&str] = &["br", "hr", "img"];

/// Converts rich-text nodes into HTML
pub struct HtmlSerializer<'s> {
    settings: &'s Settings,
}

impl<'s> HtmlSerializer<'s> {
    pub fn new(settings: &'s Settings) -> Self {
        HtmlSerializer { settings }
    }

    /// Serialize a value to an HTML string.
    pub fn to_html(&self, nodes: &[Node]) -> Result<String, ConvertError> {
        dom::nodes_to_html(&self.to_dom(nodes)?)
    }

    /// Build DOM nodes for a value.
    pub fn to_dom(&self, nodes: &[Node]) -> Result<Vec<Handle>, ConvertError> {
        let mut out = Vec::new();
        for node in nodes {
            out.extend(self.serialize(node)?);
        }
        Ok(out)
    }

    pub fn serialize(&self, node: &Node) -> Result<Vec<Handle>, ConvertError> {
        match node {
            Node::Text(text) => self.serialize_text(text),
            Node::Element(element) => self.serialize_element(element),
        }
    }

    fn serialize_text(&self, node: &TextNode) -> Result<Vec<Handle>, ConvertError> {
        let mut out = Vec::new();
        for (i, line) in node.text.split('\n').enumerate() {
            if i > 0 {
                out.push(dom::create_element("br", &[]));
            }
            out.push(inline_text(line, &node.marks)?);
        }
        Ok(out)
    }

    fn serialize_element(&self, element: &ElementNode) -> Result<Vec<Handle>, ConvertError> {
        // Placeholders are consumed by block extraction and never render,
        // whatever their `data` holds.
        if element.kind == PLACEHOLDER_TAG {
            return Ok(Vec::new());
        }
        let accepted = self.settings.is_accepted_type(&element.kind);
        if !accepted && element.field("data").is_some_and(is_truthy) {
            let span = dom::create_element("span", &[(SLATE_DATA, &stub_json(element)?)]);
            dom::append_all(&span, self.to_dom(&element.children)?);
            return Ok(vec![span]);
        }
        if let Some(handler) = ELEMENT_HANDLERS.get(element.kind.as_str()) {
            return handler(self, element);
        }
        if accepted {
            return self.tag_with_children(&element.kind, Vec::new(), element, &[]);
        }
        let div = dom::create_element("div", &[(SLATE_NODE, &stub_json(element)?)]);
        dom::append_all(&div, self.to_dom(&element.children)?);
        Ok(vec![div])
    }

    /// `<tag attrs>children</tag>`; fields not listed in `consumed` go into a
    /// restore stub on the same tag.
    fn tag_with_children(
        &self,
        tag: &str,
        mut attrs: Vec<(&str, String)>,
        element: &ElementNode,
        consumed: &[&str],
    ) -> Result<Vec<Handle>, ConvertError> {
        let has_extras = element
            .fields
            .keys()
            .any(|key| !consumed.contains(&key.as_str()));
        if has_extras {
            attrs.push((SLATE_DATA, stub_json(element)?));
        }
        let borrowed: Vec<(&str, &str)> = attrs.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let handle = dom::create_element(tag, &borrowed);
        if !VOID_TAGS.contains(&tag) {
            dom::append_all(&handle, self.to_dom(&element.children)?);
        }
        Ok(vec![handle])
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Number(_) => true,
    }
}

fn to_json(value: &Map<String, Value>) -> Result<String, ConvertError> {
    serde_json::to_string(value).map_err(|e| ConvertError::Serialization(e.to_string()))
}

fn stub_json(element: &ElementNode) -> Result<String, ConvertError> {
    to_json(&element.to_stub())
}

/// Text leaf, wrapped in a stub span when it carries marks.
fn inline_text(text: &str, marks: &Map<String, Value>) -> Result<Handle, ConvertError> {
    if marks.is_empty() {
        return Ok(dom::create_text(text));
    }
    Ok(dom::element_with_text("span", &[(SLATE_NODE, &to_json(marks)?)], text))
}

fn handle_paragraph(ser: &HtmlSerializer<'_>, element: &ElementNode) -> Result<Vec<Handle>, ConvertError> {
    if element.field_str("styleName") == Some("text-center") {
        let attrs = vec![("style", "text-align: center;".to_string())];
        return ser.tag_with_children("p", attrs, element, &["styleName"]);
    }
    ser.tag_with_children("p", Vec::new(), element, &[])
}

fn handle_link(ser: &HtmlSerializer<'_>, element: &ElementNode) -> Result<Vec<Handle>, ConvertError> {
    let url = element
        .field("data")
        .and_then(|data| data.get("url"))
        .and_then(Value::as_str);
    // Only a bare {"url": ...} is fully expressed by href.
    let plain = match element.field("data") {
        None => true,
        Some(Value::Object(data)) => data.len() == 1 && url.is_some(),
        Some(_) => false,
    };
    let attrs = url
        .map(|href| vec![("href", href.to_string())])
        .unwrap_or_default();
    let consumed: &[&str] = if plain { &["data"] } else { &[] };
    ser.tag_with_children("a", attrs, element, consumed)
}

fn handle_image(ser: &HtmlSerializer<'_>, element: &ElementNode) -> Result<Vec<Handle>, ConvertError> {
    let url = element.field_str("url").unwrap_or_default();
    let src = match element.field_str("scale") {
        Some(scale) if !scale.is_empty() => format!("{url}/@@images/image/{scale}"),
        _ => url.to_string(),
    };

    let mut attrs = vec![("src", src)];
    for key in ["alt", "title"] {
        if let Some(value) = element.field_str(key).filter(|v| !v.is_empty()) {
            attrs.push((key, value.to_string()));
        }
    }
    if let Some(align) = element.field_str("align").filter(|a| matches!(*a, "left" | "right")) {
        attrs.push(("style", format!("float: {align};")));
    }
    ser.tag_with_children("img", attrs, element, &["url", "scale", "alt", "title", "align"])
}
