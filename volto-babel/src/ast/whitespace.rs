//! Inline whitespace collapsing
//!
//! HTML sources are full of indentation, line breaks and padding between
//! tags that a browser never renders. Rich text stores text literally, so
//! every text node is collapsed the way a browser would display it before it
//! becomes an AST leaf. The rules run in order:
//!
//! 1. whitespace-only padding next to block elements disappears
//! 2. whitespace around line breaks is dropped
//! 3. tabs become spaces
//! 4. line breaks become spaces
//! 5. runs of spaces collapse, and a leading space is dropped when the text
//!    rendered just before this node already ends with one
//! 6. leading whitespace at the start of a block and trailing whitespace at
//!    the end of a block (or before a `<br>`) is dropped
//!
//! Rules 2 to 4 and the first half of 5 are exposed as pure string functions.

use crate::dom;
use crate::settings::Settings;
use markup5ever_rcdom::{Handle, NodeData};
use once_cell::sync::Lazy;
use regex::Regex;

static SPACE_BEFORE_ENDLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\n").unwrap());
static SPACE_AFTER_ENDLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s+").unwrap());
static MULTIPLE_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r" ( +)").unwrap());
static LEADING_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+").unwrap());
static TRAILING_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s$").unwrap());

/// Text of `node` as a browser would render it in place.
///
/// Works for text nodes and elements; for an element the whole text content
/// is collapsed using the element's own neighbours.
pub fn collapse_inline_space(node: &Handle, settings: &Settings) -> String {
    let text = raw_text(node);
    let text = clean_padding_text(text, node, settings);
    let text = remove_space_before_after_endline(&text);
    let text = convert_tabs_to_spaces(&text);
    let text = convert_linebreaks_to_spaces(&text);
    let text = remove_space_follow_space(&text, node, settings);
    remove_element_edges(text, node, settings)
}

/// `"a \n b"` → `"a\nb"`
pub fn remove_space_before_after_endline(text: &str) -> String {
    let text = SPACE_BEFORE_ENDLINE.replace_all(text, "\n");
    SPACE_AFTER_ENDLINE.replace_all(&text, "\n").into_owned()
}

pub fn convert_tabs_to_spaces(text: &str) -> String {
    text.replace('\t', " ")
}

pub fn convert_linebreaks_to_spaces(text: &str) -> String {
    text.replace('\n', " ")
}

/// `"a   b"` → `"a b"`
pub fn collapse_multiple_spaces(text: &str) -> String {
    MULTIPLE_SPACE.replace_all(text, " ").into_owned()
}

fn raw_text(node: &Handle) -> String {
    match &node.data {
        NodeData::Text { contents } => contents.borrow().to_string(),
        NodeData::Element { .. } => dom::text_content(node),
        _ => String::new(),
    }
}

fn is_whitespace(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

/// Text and comments count as inline, elements by tag name.
fn is_inline(node: &Handle, settings: &Settings) -> bool {
    match &node.data {
        NodeData::Text { .. } | NodeData::Comment { .. } => true,
        NodeData::Element { name, .. } => settings.is_inline_tag(&name.local),
        _ => false,
    }
}

fn is_block_element(node: &Handle, settings: &Settings) -> bool {
    dom::is_element(node) && !is_inline(node, settings)
}

/// `<body>` and above: nothing before it renders as text.
fn is_boundary(node: &Handle) -> bool {
    match &node.data {
        NodeData::Element { name, .. } => matches!(&*name.local, "body" | "html"),
        _ => true,
    }
}

fn clean_padding_text(text: String, node: &Handle, settings: &Settings) -> String {
    if !is_whitespace(&text) {
        return text;
    }

    let prev = dom::previous_sibling(node);
    let next = dom::next_sibling(node);

    let between_blocks = prev.as_ref().is_some_and(|p| is_block_element(p, settings))
        && next.as_ref().is_some_and(|n| is_block_element(n, settings));
    if between_blocks || prev.is_some() != next.is_some() {
        return String::new();
    }

    text
}

fn strip_one_leading_space(text: &str) -> String {
    text.strip_prefix(' ').unwrap_or(text).to_string()
}

fn remove_space_follow_space(text: &str, node: &Handle, settings: &Settings) -> String {
    let text = collapse_multiple_spaces(text);
    if !text.starts_with(' ') {
        return text;
    }

    if let Some(prev) = dom::previous_sibling(node) {
        let rendered_ends_in_space = match &prev.data {
            NodeData::Text { contents } => contents.borrow().ends_with(' '),
            NodeData::Element { .. } if is_inline(&prev, settings) => {
                collapse_inline_space(&prev, settings).ends_with(' ')
            }
            _ => false,
        };
        return if rendered_ends_in_space {
            strip_one_leading_space(&text)
        } else {
            text
        };
    }

    // First child: the preceding rendered text sits before the nearest
    // ancestor that has a previous sibling, climbing through inline ancestors.
    let mut ancestor = dom::parent(node);
    loop {
        let current = match ancestor {
            Some(current) if !is_boundary(&current) => current,
            _ => return strip_one_leading_space(&text),
        };
        if let Some(prev) = dom::previous_sibling(&current) {
            return if collapse_inline_space(&prev, settings).ends_with(' ') {
                strip_one_leading_space(&text)
            } else {
                text
            };
        }
        match dom::parent(&current) {
            Some(up) if is_inline(&up, settings) => ancestor = Some(up),
            _ => return strip_one_leading_space(&text),
        }
    }
}

/// Next inline sibling of the node, or of its closest inline ancestor that
/// has a next sibling.
fn inline_ancestor_sibling(node: &Handle, settings: &Settings) -> Option<Handle> {
    let mut current = node.clone();
    let mut next = dom::next_sibling(&current);

    while next.is_none() {
        match dom::parent(&current) {
            Some(parent) if is_inline(&parent, settings) => {
                next = dom::next_sibling(&parent);
                current = parent;
            }
            _ => break,
        }
    }

    next.filter(|n| is_inline(n, settings))
}

fn remove_element_edges(text: String, node: &Handle, settings: &Settings) -> String {
    let prev = dom::previous_sibling(node);
    let next = dom::next_sibling(node);
    let parent_is_inline = dom::parent(node).is_some_and(|p| is_inline(&p, settings));

    let mut text = text;
    if !parent_is_inline && prev.is_none() && LEADING_SPACE.is_match(&text) {
        text = LEADING_SPACE.replace(&text, "").into_owned();
    }

    if TRAILING_SPACE.is_match(&text) {
        let followed_by_break = next.as_ref().is_some_and(|n| dom::is_tag(n, "br"));
        if inline_ancestor_sibling(node, settings).is_none() || followed_by_break {
            text = TRAILING_SPACE.replace(&text, "").into_owned();
        }
    }

    text
}
