//! HTML → blocks
//!
//! Preprocess the markup, parse what is left into a rich-text value, then
//! extract blocks from it. Nested content (tab panels, accordion bodies,
//! column cells) goes through the same path one level deeper.

use super::{extract, preprocess, Block};
use crate::context::Context;
use crate::dom;
use crate::error::ConvertError;
use markup5ever_rcdom::Handle;

/// Convert a full HTML document or fragment into `(id, block)` pairs.
pub fn html_to_blocks(
    ctx: &mut Context<'_>,
    html: &str,
) -> Result<Vec<(String, Block)>, ConvertError> {
    let document = dom::parse(html);
    let Some(body) = dom::body(&document) else {
        return Ok(Vec::new());
    };
    preprocess::run(ctx, &body)?;
    let markup = dom::inner_html(&body)?;
    let nodes = ctx.deserializer().from_html(&markup)?;
    extract::ast_to_blocks(ctx, &nodes)
}

/// Convert an element (and everything in it) into blocks, one level deeper.
pub fn element_to_blocks(
    ctx: &mut Context<'_>,
    element: &Handle,
) -> Result<Vec<(String, Block)>, ConvertError> {
    ctx.nested(|ctx| {
        preprocess::run(ctx, element)?;
        let markup = dom::to_html(element)?;
        let nodes = ctx.deserializer().from_html(&markup)?;
        extract::ast_to_blocks(ctx, &nodes)
    })
}
