//! Small toolkit over the html5ever reference DOM
//!
//! Parsing, tree navigation, in-place edits and serialization of
//! `markup5ever_rcdom` handles. Every direction of the conversion works on
//! this DOM: incoming HTML is parsed into it, preprocessors rewrite it, and
//! outgoing HTML is built from it and serialized.

use crate::error::ConvertError;
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{ns, parse_document, Attribute, LocalName, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Parse a complete or partial HTML document.
pub fn parse(html: &str) -> RcDom {
    parse_document(RcDom::default(), ParseOpts::default()).one(html)
}

/// The `<body>` element of a parsed document.
pub fn body(dom: &RcDom) -> Option<Handle> {
    let html = find_child(&dom.document, |n| is_tag(n, "html"))?;
    find_child(&html, |n| is_tag(n, "body"))
}

/// Tag name of an element node.
pub fn tag_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

pub fn is_element(node: &Handle) -> bool {
    matches!(node.data, NodeData::Element { .. })
}

pub fn is_tag(node: &Handle, tag: &str) -> bool {
    tag_name(node) == Some(tag)
}

/// Value of an attribute.
pub fn attr(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

pub fn has_attr(node: &Handle, name: &str) -> bool {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs.borrow().iter().any(|a| &*a.name.local == name),
        _ => false,
    }
}

/// All attributes of an element, in source order.
pub fn attrs(node: &Handle) -> Vec<(String, String)> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .map(|a| (a.name.local.to_string(), a.value.to_string()))
            .collect(),
        _ => Vec::new(),
    }
}

/// Whether the `class` attribute lists `class`.
pub fn has_class(node: &Handle, class: &str) -> bool {
    attr(node, "class")
        .map(|value| value.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

/// JSON object held by an attribute; an absent attribute reads as `{}`.
pub fn json_object_attr(node: &Handle, name: &str) -> Result<Map<String, Value>, ConvertError> {
    let Some(raw) = attr(node, name) else {
        return Ok(Map::new());
    };
    match serde_json::from_str(&raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ConvertError::InvalidJson {
            attribute: name.to_string(),
            message: "expected a JSON object".to_string(),
        }),
        Err(e) => Err(ConvertError::invalid_json(name, e)),
    }
}

pub fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take()?;
    let parent = weak.upgrade();
    node.parent.set(Some(weak));
    parent
}

fn position(node: &Handle) -> Option<(Handle, usize)> {
    let parent = parent(node)?;
    let index = parent
        .children
        .borrow()
        .iter()
        .position(|child| Rc::ptr_eq(child, node))?;
    Some((parent, index))
}

pub fn previous_sibling(node: &Handle) -> Option<Handle> {
    let (parent, index) = position(node)?;
    let sibling = match index.checked_sub(1) {
        Some(i) => parent.children.borrow().get(i).cloned(),
        None => None,
    };
    sibling
}

pub fn next_sibling(node: &Handle) -> Option<Handle> {
    let (parent, index) = position(node)?;
    let sibling = parent.children.borrow().get(index + 1).cloned();
    sibling
}

/// First following sibling element matching `pred`.
pub fn next_sibling_matching(node: &Handle, pred: impl Fn(&Handle) -> bool) -> Option<Handle> {
    let (parent, index) = position(node)?;
    let found = parent.children.borrow()[index + 1..]
        .iter()
        .find(|sibling| is_element(sibling) && pred(sibling))
        .cloned();
    found
}

pub fn children(node: &Handle) -> Vec<Handle> {
    node.children.borrow().clone()
}

pub fn element_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|child| is_element(child))
        .cloned()
        .collect()
}

fn find_child(node: &Handle, pred: impl Fn(&Handle) -> bool) -> Option<Handle> {
    node.children.borrow().iter().find(|c| pred(c)).cloned()
}

/// Descendants of `node` in document order, `node` itself excluded.
pub fn descendants(node: &Handle) -> Vec<Handle> {
    let mut out = Vec::new();
    let mut stack: Vec<Handle> = node.children.borrow().iter().rev().cloned().collect();
    while let Some(current) = stack.pop() {
        stack.extend(current.children.borrow().iter().rev().cloned());
        out.push(current);
    }
    out
}

/// Descendant elements matching `pred`, in document order.
pub fn find_all(root: &Handle, pred: impl Fn(&Handle) -> bool) -> Vec<Handle> {
    descendants(root)
        .into_iter()
        .filter(|n| is_element(n) && pred(n))
        .collect()
}

pub fn find_first(root: &Handle, pred: impl Fn(&Handle) -> bool) -> Option<Handle> {
    descendants(root)
        .into_iter()
        .find(|n| is_element(n) && pred(n))
}

/// Nearest ancestor matching `pred`, searching no higher than `root`.
pub fn find_ancestor(
    node: &Handle,
    root: &Handle,
    pred: impl Fn(&Handle) -> bool,
) -> Option<Handle> {
    let mut current = parent(node);
    while let Some(candidate) = current {
        if Rc::ptr_eq(&candidate, root) {
            return None;
        }
        if pred(&candidate) {
            return Some(candidate);
        }
        current = parent(&candidate);
    }
    None
}

/// Whether `node` still hangs (transitively) below `root`.
pub fn is_attached(node: &Handle, root: &Handle) -> bool {
    let mut current = parent(node);
    while let Some(candidate) = current {
        if Rc::ptr_eq(&candidate, root) {
            return true;
        }
        current = parent(&candidate);
    }
    false
}

/// Concatenated text of all descendant text nodes.
pub fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        _ => {
            for child in node.children.borrow().iter() {
                collect_text(child, out);
            }
        }
    }
}

/// Raw contents of a text node.
pub fn text(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Text { contents } => Some(contents.borrow().to_string()),
        _ => None,
    }
}

pub fn append(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

pub fn append_all(parent: &Handle, children: impl IntoIterator<Item = Handle>) {
    for child in children {
        append(parent, child);
    }
}

/// Put `replacement` where `old` is and detach `old`.
pub fn replace_with(old: &Handle, replacement: Handle) {
    if let Some((parent, index)) = position(old) {
        replacement.parent.set(Some(Rc::downgrade(&parent)));
        parent.children.borrow_mut()[index] = replacement;
        old.parent.set(None);
    }
}

pub fn detach(node: &Handle) {
    if let Some((parent, index)) = position(node) {
        parent.children.borrow_mut().remove(index);
        node.parent.set(None);
    }
}

/// Create an HTML element with attributes
pub fn create_element(tag: &str, attrs: &[(&str, &str)]) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(*name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a text node
pub fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

/// Element holding a single text child.
pub fn element_with_text(tag: &str, attrs: &[(&str, &str)], text: &str) -> Handle {
    let element = create_element(tag, attrs);
    append(&element, create_text(text));
    element
}

/// Serialize a node, the node itself included.
pub fn to_html(node: &Handle) -> Result<String, ConvertError> {
    write_html(node, TraversalScope::IncludeNode)
}

/// Serialize the children of a node.
pub fn inner_html(node: &Handle) -> Result<String, ConvertError> {
    write_html(node, TraversalScope::ChildrenOnly(None))
}

/// Serialize a sequence of sibling nodes.
pub fn nodes_to_html(nodes: &[Handle]) -> Result<String, ConvertError> {
    let mut out = String::new();
    for node in nodes {
        out.push_str(&to_html(node)?);
    }
    Ok(out)
}

fn write_html(node: &Handle, traversal_scope: TraversalScope) -> Result<String, ConvertError> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope,
        ..Default::default()
    };
    let serializable = SerializableHandle::from(node.clone());
    serialize(&mut output, &serializable, opts)
        .map_err(|e| ConvertError::Serialization(format!("HTML serialization failed: {e}")))?;
    String::from_utf8(output)
        .map_err(|e| ConvertError::Serialization(format!("UTF-8 conversion failed: {e}")))
}
