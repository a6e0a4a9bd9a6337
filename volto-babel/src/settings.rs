//! Conversion settings
//!
//! The tables here drive every direction of the conversion: which HTML tags
//! survive as rich-text elements, which ones count as inline for whitespace
//! and top-level wrapping, and how many grid columns a table cell spans.
//! `volto-config` loads the same tables from TOML and converts them into
//! [`Settings`].

use std::collections::{BTreeMap, BTreeSet};

/// Tags kept as rich-text elements when converting HTML to the AST.
pub const ACCEPTED_TAGS: &[&str] = &[
    "a", "b", "blockquote", "br", "code", "del", "div", "em", "h1", "h2", "h3", "h4", "h5",
    "h6", "i", "img", "li", "ol", "p", "pre", "s", "strong", "sub", "sup", "table", "tbody",
    "td", "tfoot", "th", "thead", "tr", "u", "ul", "video",
];

/// HTML elements rendered inline by browsers.
pub const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "acronym", "audio", "b", "bdi", "bdo", "big", "br", "button", "canvas", "cite",
    "code", "data", "datalist", "del", "dfn", "em", "embed", "i", "iframe", "img", "input",
    "ins", "kbd", "label", "map", "mark", "meter", "noscript", "object", "output", "picture",
    "progress", "q", "ruby", "s", "samp", "script", "select", "slot", "small", "span", "strong",
    "sub", "sup", "svg", "template", "textarea", "time", "u", "tt", "var", "video", "wbr",
];

/// Rich-text types allowed as the root of a rich-text block.
pub const TOPLEVEL_TYPES: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "blockquote", "pre", "table", "div",
    "callout",
];

/// Grid width names keyed by `12 / number of cells`.
pub const COLUMN_WIDTHS: &[(usize, &str)] = &[
    (2, "oneThird"),
    (3, "oneThird"),
    (4, "oneThird"),
    (5, "oneThird"),
    (6, "halfWidth"),
    (7, "twoThirds"),
    (8, "twoThirds"),
    (9, "twoThirds"),
    (10, "twoThirds"),
    (12, "full"),
];

/// AST type used for hyperlinks; it has no HTML tag of the same name.
pub const LINK_TYPE: &str = "link";

/// Read-only configuration shared by all conversions
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Tags kept as rich-text elements
    pub accepted_tags: BTreeSet<String>,
    /// Tags treated as inline content
    pub inline_elements: BTreeSet<String>,
    /// Element type used to wrap stray inline content
    pub default_block_type: String,
    /// Types that may be the root of a rich-text block
    pub toplevel_types: BTreeSet<String>,
    /// Grid width names keyed by `12 / cells`
    pub column_widths: BTreeMap<usize, String>,
    /// Maximum nesting of container conversions
    pub max_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        fn set(items: &[&str]) -> BTreeSet<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Settings {
            accepted_tags: set(ACCEPTED_TAGS),
            inline_elements: set(INLINE_ELEMENTS),
            default_block_type: "p".to_string(),
            toplevel_types: set(TOPLEVEL_TYPES),
            column_widths: COLUMN_WIDTHS
                .iter()
                .map(|(span, name)| (*span, name.to_string()))
                .collect(),
            max_depth: 32,
        }
    }
}

impl Settings {
    /// Whether an HTML tag is kept as a rich-text element.
    pub fn is_accepted_tag(&self, tag: &str) -> bool {
        self.accepted_tags.contains(tag)
    }

    /// Whether an AST element type maps onto a known tag (or is a link).
    pub fn is_accepted_type(&self, kind: &str) -> bool {
        kind == LINK_TYPE || self.accepted_tags.contains(kind)
    }

    /// Whether an HTML tag renders inline.
    pub fn is_inline_tag(&self, tag: &str) -> bool {
        self.inline_elements.contains(tag)
    }

    /// Whether an AST element type is inline content.
    pub fn is_inline_type(&self, kind: &str) -> bool {
        kind == LINK_TYPE || self.inline_elements.contains(kind)
    }

    /// Whether an AST element type may root a rich-text block.
    pub fn is_toplevel_type(&self, kind: &str) -> bool {
        self.toplevel_types.contains(kind)
    }

    /// Width name for a column spanning `span` twelfths of the grid.
    pub fn column_width(&self, span: usize) -> Option<&str> {
        self.column_widths.get(&span).map(String::as_str)
    }
}
