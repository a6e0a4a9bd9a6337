//! Widget markup → placeholders
//!
//! Legacy pages carry widgets (tabs, accordions, embedded maps and videos,
//! buttons) and annotated block markup (heroes, grids, teasers) that plain
//! rich text cannot express. Each preprocessor finds its pattern below a root
//! element, builds the block payload (converting nested content recursively)
//! and swaps the matched element for a `<voltoblock>` placeholder carrying the
//! payload. The extractor later turns placeholders back into blocks.
//!
//! Preprocessors run in a fixed order. Matches are collected up front in
//! document order; a match that an earlier rewrite already removed from the
//! tree is skipped.

use super::pipeline::element_to_blocks;
use super::{Block, BlockTree};
use crate::context::Context;
use crate::diagnostics::DiagnosticKind;
use crate::dom;
use crate::error::ConvertError;
use crate::markers::{
    BLOCK_DATA, BLOCK_TYPE, CALL_TO_ACTION, FIELD_NAME, MODEL_TYPE, PLACEHOLDER_DATA,
    PLACEHOLDER_TAG, SECTION,
};
use markup5ever_rcdom::Handle;
use serde_json::{json, Map, Value};

/// Translatable text fields of a hero.
pub(crate) const HERO_FIELDS: [&str; 2] = ["buttonLabel", "copyright"];

type Preprocessor = fn(&mut Context<'_>, &Handle) -> Result<(), ConvertError>;

/// Preprocessors in the order they run.
pub const PREPROCESSORS: &[(&str, Preprocessor)] = &[
    ("tabs", convert_tabs),
    ("iframe", convert_iframes),
    ("video", convert_videos),
    ("accordion", convert_accordions),
    ("hero", convert_heroes),
    ("grid", convert_grids),
    ("teaser", convert_teasers),
    ("read-more", convert_read_more),
    ("button", convert_buttons),
];

pub fn run(ctx: &mut Context<'_>, root: &Handle) -> Result<(), ConvertError> {
    for (name, preprocess) in PREPROCESSORS {
        tracing::trace!(preprocessor = name, "running");
        preprocess(ctx, root)?;
    }
    Ok(())
}

/// `<voltoblock data-voltoblock="{payload}">`
pub fn placeholder(payload: &Block) -> Result<Handle, ConvertError> {
    let json = serde_json::to_string(payload.as_map())
        .map_err(|e| ConvertError::Serialization(e.to_string()))?;
    Ok(dom::create_element(PLACEHOLDER_TAG, &[(PLACEHOLDER_DATA, &json)]))
}

fn replace_with_block(target: &Handle, payload: &Block) -> Result<(), ConvertError> {
    dom::replace_with(target, placeholder(payload)?);
    Ok(())
}

/// Matches of `pred` below `root` that are still attached when their turn comes.
fn each_match(
    root: &Handle,
    pred: impl Fn(&Handle) -> bool,
) -> impl Iterator<Item = Handle> + '_ {
    dom::find_all(root, pred)
        .into_iter()
        .filter(move |node| dom::is_attached(node, root))
}

fn has_classes(node: &Handle, classes: &[&str]) -> bool {
    classes.iter().all(|class| dom::has_class(node, class))
}

fn is_div_with(node: &Handle, attribute: &str, value: &str) -> bool {
    dom::is_tag(node, "div") && dom::attr(node, attribute).as_deref() == Some(value)
}

/// Payload from `data-volto-block` with `@type` set.
pub(crate) fn annotated_payload(node: &Handle, block_type: &str) -> Result<Block, ConvertError> {
    let mut block = Block::new(block_type);
    for (key, value) in dom::json_object_attr(node, BLOCK_DATA)? {
        if key != "@type" {
            block.insert(&key, value);
        }
    }
    Ok(block)
}

/// A container holding titled panels, each a nested block tree.
fn titled_panels(
    ctx: &Context<'_>,
    panel_type: &str,
    panels: Vec<(String, Vec<(String, Block)>)>,
) -> Value {
    let mut tree = BlockTree::new();
    for (title, content) in panels {
        let mut panel = Block::new(panel_type).with("title", title);
        for (key, value) in BlockTree::from_pairs(content).to_map() {
            panel.insert(&key, value);
        }
        tree.push(ctx.fresh_id(), panel);
    }
    tree.to_value()
}

/// `ul.nav.nav-tabs` + following `div.tab-content` → tabs block.
fn convert_tabs(ctx: &mut Context<'_>, root: &Handle) -> Result<(), ConvertError> {
    let navs = each_match(root, |n| dom::is_tag(n, "ul") && has_classes(n, &["nav", "nav-tabs"]));
    for nav in navs.collect::<Vec<_>>() {
        if !dom::is_attached(&nav, root) {
            continue;
        }
        let Some(content) = dom::next_sibling_matching(&nav, |n| {
            dom::is_tag(n, "div") && dom::has_class(n, "tab-content")
        }) else {
            ctx.warn(
                DiagnosticKind::MalformedMarkup,
                "tab navigation without a following tab-content element",
            );
            continue;
        };

        let mut tabs = Vec::new();
        for item in dom::find_all(&nav, |n| dom::is_tag(n, "li")) {
            let Some(anchor) = dom::find_first(&item, |n| dom::is_tag(n, "a")) else {
                continue;
            };
            let target = dom::attr(&anchor, "href").unwrap_or_default().replace('#', "");
            let title = dom::text_content(&anchor).trim().to_string();
            let panel = dom::find_first(&content, |n| {
                dom::is_tag(n, "div") && dom::attr(n, "id").as_deref() == Some(target.as_str())
            });
            let blocks = match panel {
                Some(panel) => element_to_blocks(ctx, &panel)?,
                None => {
                    ctx.warn(
                        DiagnosticKind::MalformedMarkup,
                        format!("tab '{title}' points at missing panel '#{target}'"),
                    );
                    Vec::new()
                }
            };
            tabs.push((title, blocks));
        }

        let payload = Block::new("tabs_block").with("data", titled_panels(ctx, "tab", tabs));
        replace_with_block(&nav, &payload)?;
        dom::detach(&content);
    }
    Ok(())
}

/// Embedded iframes are maps.
fn convert_iframes(_ctx: &mut Context<'_>, root: &Handle) -> Result<(), ConvertError> {
    for iframe in each_match(root, |n| dom::is_tag(n, "iframe")).collect::<Vec<_>>() {
        let src = dom::attr(&iframe, "src").unwrap_or_default();
        replace_with_block(&iframe, &Block::new("maps").with("url", src))?;
    }
    Ok(())
}

fn convert_videos(_ctx: &mut Context<'_>, root: &Handle) -> Result<(), ConvertError> {
    for video in each_match(root, |n| dom::is_tag(n, "video")).collect::<Vec<_>>() {
        let src = dom::attr(&video, "src")
            .or_else(|| {
                dom::find_first(&video, |n| dom::is_tag(n, "source"))
                    .and_then(|source| dom::attr(&source, "src"))
            })
            .unwrap_or_default();
        replace_with_block(&video, &Block::new("nextCloudVideo").with("url", src))?;
    }
    Ok(())
}

/// `div.panel-group` of `div.panel`s → accordion block.
///
/// A "Read more" panel means the group is a read-more toggle, not an
/// accordion: the whole pass stops there and leaves it to the read-more
/// preprocessor.
fn convert_accordions(ctx: &mut Context<'_>, root: &Handle) -> Result<(), ConvertError> {
    let groups: Vec<_> =
        each_match(root, |n| dom::is_tag(n, "div") && dom::has_class(n, "panel-group")).collect();
    for group in groups {
        if !dom::is_attached(&group, root) {
            continue;
        }
        let mut panels = Vec::new();
        for panel in dom::find_all(&group, |n| dom::is_tag(n, "div") && dom::has_class(n, "panel")) {
            if !dom::is_attached(&panel, &group) {
                continue;
            }
            let title = dom::find_first(&panel, |n| {
                dom::is_tag(n, "h4") && dom::has_class(n, "panel-title")
            })
            .map(|heading| dom::text_content(&heading).trim().to_string())
            .unwrap_or_default();
            if title == "Read more" {
                return Ok(());
            }

            let mut content = Vec::new();
            for body in dom::find_all(&panel, |n| dom::is_tag(n, "div") && dom::has_class(n, "panel-body")) {
                if dom::is_attached(&body, &panel) {
                    content.extend(element_to_blocks(ctx, &body)?);
                }
            }
            panels.push((title, content));
        }

        let payload = Block::new("accordion")
            .with("collapsed", "true")
            .with("non_exclusive", "true")
            .with("right_arrows", "true")
            .with("styles", json!({}))
            .with("data", titled_panels(ctx, "accordionPanel", panels));
        replace_with_block(&group, &payload)?;
    }
    Ok(())
}

/// Text of the first `field` div under `root`, skipping nested sections.
fn field_text(root: &Handle, field: &str) -> Option<String> {
    dom::find_first(root, |n| {
        is_div_with(n, FIELD_NAME, field)
            && dom::find_ancestor(n, root, |a| dom::has_attr(a, SECTION)).is_none()
    })
    .map(|div| dom::text_content(&div))
}

/// Merge a nested tree into the payload's `data` object.
pub(crate) fn merge_into_data(block: &mut Block, tree: BlockTree) {
    let mut data = match block.remove("data") {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    data.extend(tree.to_map());
    block.insert("data", Value::Object(data));
}

/// Hero payload without its nested blocks.
pub(crate) fn hero_payload(hero: &Handle) -> Result<Block, ConvertError> {
    let mut payload = annotated_payload(hero, "hero")?;
    for field in HERO_FIELDS {
        if let Some(text) = field_text(hero, field) {
            payload.insert(field, text);
        }
    }
    Ok(payload)
}

fn convert_heroes(ctx: &mut Context<'_>, root: &Handle) -> Result<(), ConvertError> {
    for hero in each_match(root, |n| is_div_with(n, BLOCK_TYPE, "hero")).collect::<Vec<_>>() {
        if !dom::is_attached(&hero, root) {
            continue;
        }
        let mut payload = hero_payload(&hero)?;
        if let Some(section) = dom::find_first(&hero, |n| is_div_with(n, SECTION, "blocks")) {
            let blocks = element_to_blocks(ctx, &section)?;
            merge_into_data(&mut payload, BlockTree::from_pairs(blocks));
        }
        replace_with_block(&hero, &payload)?;
    }
    Ok(())
}

fn convert_grids(ctx: &mut Context<'_>, root: &Handle) -> Result<(), ConvertError> {
    for grid in each_match(root, |n| is_div_with(n, BLOCK_TYPE, "gridBlock")).collect::<Vec<_>>() {
        if !dom::is_attached(&grid, root) {
            continue;
        }
        let mut payload = annotated_payload(&grid, "gridBlock")?;
        let blocks = element_to_blocks(ctx, &grid)?;
        for (key, value) in BlockTree::from_pairs(blocks).to_map() {
            payload.insert(&key, value);
        }
        replace_with_block(&grid, &payload)?;
    }
    Ok(())
}

fn is_child_of(node: &Handle, parent: &Handle) -> bool {
    dom::parent(node).is_some_and(|p| std::rc::Rc::ptr_eq(&p, parent))
}

/// Teaser payload: `data-volto-block`, direct-child fields, and the item
/// model with its call to action.
pub(crate) fn teaser_payload(teaser: &Handle) -> Result<Block, ConvertError> {
    let mut payload = annotated_payload(teaser, "teaser")?;

    for field in dom::find_all(teaser, |n| dom::is_tag(n, "div") && dom::has_attr(n, FIELD_NAME)) {
        if !is_child_of(&field, teaser) {
            continue;
        }
        if let Some(name) = dom::attr(&field, FIELD_NAME) {
            payload.insert(&name, dom::text_content(&field));
        }
    }

    let model = dom::find_first(teaser, |n| dom::is_tag(n, "div") && dom::has_attr(n, MODEL_TYPE))
        .filter(|model| is_child_of(model, teaser));
    if let Some(model) = model {
        let mut item = dom::json_object_attr(&model, BLOCK_DATA)?;
        if let Some(model_type) = dom::attr(&model, MODEL_TYPE).filter(|t| !t.is_empty()) {
            item.insert("@type".to_string(), Value::String(model_type));
        }
        let cta = dom::find_first(&model, |n| dom::is_tag(n, "div") && dom::has_attr(n, CALL_TO_ACTION));
        if let Some(cta) = cta {
            let mut call_to_action = dom::json_object_attr(&cta, CALL_TO_ACTION)?;
            if let Some(label) = field_text(&cta, "label") {
                call_to_action.insert("label".to_string(), Value::String(label));
            }
            item.insert("callToAction".to_string(), Value::Object(call_to_action));
        }
        payload.insert("itemModel", Value::Object(item));
    }
    Ok(payload)
}

fn convert_teasers(_ctx: &mut Context<'_>, root: &Handle) -> Result<(), ConvertError> {
    for teaser in each_match(root, |n| is_div_with(n, BLOCK_TYPE, "teaser")).collect::<Vec<_>>() {
        if !dom::is_attached(&teaser, root) {
            continue;
        }
        let payload = teaser_payload(&teaser)?;
        replace_with_block(&teaser, &payload)?;
    }
    Ok(())
}

fn convert_read_more(_ctx: &mut Context<'_>, root: &Handle) -> Result<(), ConvertError> {
    let toggles = each_match(root, |n| {
        dom::is_tag(n, "a")
            && dom::has_class(n, "accordion-toggle")
            && dom::text_content(n) == "Read more"
    });
    for toggle in toggles.collect::<Vec<_>>() {
        let payload = Block::new("readMoreBlock")
            .with("height", "50vh")
            .with("label_closed", "Read more")
            .with("label_opened", "Read less")
            .with("label_position", "right");
        replace_with_block(&toggle, &payload)?;
    }
    Ok(())
}

/// `a.bluebutton` → call-to-action block replacing its paragraph.
fn convert_buttons(_ctx: &mut Context<'_>, root: &Handle) -> Result<(), ConvertError> {
    let buttons: Vec<_> =
        each_match(root, |n| dom::is_tag(n, "a") && dom::has_class(n, "bluebutton")).collect();
    for button in buttons {
        if !dom::is_attached(&button, root) {
            continue;
        }
        let payload = Block::new("callToActionBlock")
            .with("text", dom::text_content(&button))
            .with("href", dom::attr(&button, "href").unwrap_or_default())
            .with(
                "target",
                dom::attr(&button, "target").unwrap_or_else(|| "_self".to_string()),
            )
            .with(
                "styles",
                json!({"icon": "ri-share-line", "theme": "primary", "align": "left"}),
            );
        let target = dom::find_ancestor(&button, root, |n| dom::is_tag(n, "p")).unwrap_or(button);
        replace_with_block(&target, &payload)?;
    }
    Ok(())
}
