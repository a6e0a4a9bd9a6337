//! Built-in block codecs
//!
//! - [`richtext`]: blocks whose content is a rich-text value (`slate`,
//!   `slateTable`, `quote`, `callout`, `item`)
//! - [`fields`]: flat payloads with a few translatable strings, images and
//!   the page title block
//! - [`layout`]: blocks nesting further block trees (columns, tabs,
//!   accordions, groups, grids, heroes)
//! - [`teaser`]: teasers with their item model, and teaser grids

pub mod fields;
pub mod layout;
pub mod richtext;
pub mod teaser;
