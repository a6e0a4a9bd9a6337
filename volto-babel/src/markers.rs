//! Attribute vocabulary of the annotated HTML
//!
//! These names are a wire contract with the translation tooling and the CMS
//! front end. Changing one breaks documents already in flight.

/// Block type of a wrapper element
pub const BLOCK_TYPE: &str = "data-block-type";
/// JSON residual of a block payload (fields not rendered as HTML)
pub const BLOCK_DATA: &str = "data-volto-block";
/// Block id, so ids survive a round trip
pub const BLOCK_UID: &str = "data-block-uid";
/// Translatable field rendered as element text
pub const FIELD_NAME: &str = "data-fieldname";
/// Settings of a column in a layout block
pub const COLUMN_DATA: &str = "data-volto-column-data";
/// Metadata element of a titled column (tab, accordion panel)
pub const COLUMN_META: &str = "data-volto-column";
/// Section holding the nested blocks of a hero
pub const SECTION: &str = "data-volto-section";
/// Type of the item model of a teaser
pub const MODEL_TYPE: &str = "data-model-type";
/// Call-to-action settings of a teaser item model
pub const CALL_TO_ACTION: &str = "data-volto-calltoaction";
/// Top-level content field of an annotated document
pub const CONTENT_FIELD: &str = "data-field";

/// Rich-text node that has no HTML counterpart
pub const SLATE_NODE: &str = "data-slate-node";
/// Full rich-text node, restored verbatim when parsed back
pub const SLATE_DATA: &str = "data-slate-data";

/// Placeholder element standing in for a finished block
pub const PLACEHOLDER_TAG: &str = "voltoblock";
/// JSON payload of a placeholder
pub const PLACEHOLDER_DATA: &str = "data-voltoblock";
