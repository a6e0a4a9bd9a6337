//! Structural clean-up of parsed rich text
//!
//! After deserialization every value goes through [`normalize`]:
//!
//! - runs of top-level inline content are wrapped in the default block
//! - adjacent text leaves are merged into one
//! - elements left without children get a single empty text leaf

use super::{ElementNode, Node};
use crate::settings::Settings;

pub fn normalize(settings: &Settings, nodes: Vec<Node>) -> Vec<Node> {
    ensure_block_level(settings, nodes)
        .into_iter()
        .map(normalize_node)
        .collect()
}

fn normalize_node(node: Node) -> Node {
    match node {
        Node::Text(text) => Node::Text(text),
        Node::Element(element) => {
            let children = element.children.into_iter().map(normalize_node).collect();
            let mut children = merge_adjacent_text(children);
            if children.is_empty() {
                children.push(Node::text(""));
            }
            Node::Element(ElementNode {
                children,
                ..element
            })
        }
    }
}

/// Merge every run of neighbouring text leaves into one leaf.
///
/// The merged leaf keeps the marks of the first leaf in the run; marks of the
/// following leaves are dropped.
pub fn merge_adjacent_text(children: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(children.len());
    for child in children {
        if let (Some(Node::Text(last)), Node::Text(next)) = (out.last_mut(), &child) {
            last.text.push_str(&next.text);
            continue;
        }
        out.push(child);
    }
    out
}

fn is_inline(settings: &Settings, node: &Node) -> bool {
    match node {
        Node::Text(_) => true,
        Node::Element(element) => settings.is_inline_type(&element.kind),
    }
}

/// Wrap runs of inline nodes in the default block type.
pub fn ensure_block_level(settings: &Settings, nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut run: Vec<Node> = Vec::new();

    for node in nodes {
        if is_inline(settings, &node) {
            run.push(node);
            continue;
        }
        if !run.is_empty() {
            out.push(Node::element(
                settings.default_block_type.clone(),
                std::mem::take(&mut run),
            ));
        }
        out.push(node);
    }
    if !run.is_empty() {
        out.push(Node::element(settings.default_block_type.clone(), run));
    }
    out
}
