//! Blocks → annotated HTML → blocks gives the same tree back.

use crate::common::{round_trip, to_blocks};
use serde_json::{json, Value};
use volto_babel::BlockTree;

fn slate(text: &str) -> Value {
    json!({
        "@type": "slate",
        "plaintext": text,
        "value": [{"type": "p", "children": [{"text": text}]}]
    })
}

fn single(id: &str, block: Value) -> BlockTree {
    BlockTree::from_value(&json!({"blocks": {id: block}, "blocks_layout": {"items": [id]}}))
}

fn assert_stable(tree: &BlockTree) -> String {
    let (html, decoded) = round_trip(tree);
    assert_eq!(&decoded, tree, "annotated html was:\n{html}");
    html
}

#[test]
fn test_rich_text_from_authored_html() {
    let (tree, _) = to_blocks(
        r#"<h2>Heat</h2><p>See <a href="/x">this page</a> and <em>that one</em>.</p><blockquote>Quoted</blockquote>"#,
    );
    assert_stable(&tree);
}

#[test]
fn test_table_from_authored_html() {
    let (tree, _) = to_blocks(
        "<table><thead><tr><th>Country</th></tr></thead><tbody><tr><td>Denmark</td></tr><tr><td>Spain</td></tr></tbody></table>",
    );
    let html = assert_stable(&tree);
    assert!(html.contains("<th><p>Country</p></th>"));
}

#[test]
fn test_columns_from_layout_table() {
    let (tree, _) = to_blocks(
        r#"<table><tr><td><p>Left</p><iframe src="/a"></iframe></td><td><p>Right</p></td></tr></table>"#,
    );
    let (_, columns) = tree.ordered()[0];
    assert_eq!(columns.block_type(), Some("columnsBlock"));
    assert_stable(&tree);
}

#[test]
fn test_tabs_and_accordion_from_authored_html() {
    let (tree, _) = to_blocks(
        r##"<ul class="nav nav-tabs"><li><a href="#a">A</a></li></ul><div class="tab-content"><div id="a"><p>In tab</p></div></div><div class="panel-group"><div class="panel"><h4 class="panel-title">Q</h4><div class="panel-body"><p>Answer</p></div></div></div>"##,
    );
    let html = assert_stable(&tree);
    assert!(html.contains(r#"<div data-fieldname="title">A</div>"#));
    assert!(html.contains(r#"<div data-fieldname="title">Q</div>"#));
}

#[test]
fn test_group() {
    let tree = single(
        "g",
        json!({
            "@type": "group",
            "styles": {"backgroundColor": "grey"},
            "data": {
                "blocks": {"s1": slate("One"), "s2": slate("Two")},
                "blocks_layout": {"items": ["s1", "s2"]}
            }
        }),
    );
    assert_stable(&tree);
}

#[test]
fn test_grid_of_teasers() {
    let tree = single(
        "grid",
        json!({
            "@type": "gridBlock",
            "gridSize": 12,
            "blocks": {
                "t1": {"@type": "teaser", "title": "Heat", "href": [{"@id": "/heat"}]},
                "t2": {"@type": "teaser", "title": "Floods", "description": "River floods"}
            },
            "blocks_layout": {"items": ["t1", "t2"]}
        }),
    );
    let html = assert_stable(&tree);
    assert!(html.contains(r#"<div data-fieldname="title">Floods</div>"#));
}

#[test]
fn test_hero() {
    let tree = single(
        "h",
        json!({
            "@type": "hero",
            "buttonLabel": "Discover",
            "copyright": "Photo: EEA",
            "fullHeight": true,
            "data": {
                "blocks": {"s": slate("Welcome")},
                "blocks_layout": {"items": ["s"]}
            }
        }),
    );
    assert_stable(&tree);
}

#[test]
fn test_teaser_with_item_model() {
    let tree = single(
        "t",
        json!({
            "@type": "teaser",
            "title": "Air quality",
            "head_title": "Topic",
            "itemModel": {
                "@type": "card",
                "hasImage": false,
                "callToAction": {"enabled": true, "label": "Read more"}
            }
        }),
    );
    let (_, decoded) = round_trip(&tree);
    let (_, teaser) = decoded.ordered()[0];
    let model = teaser.get("itemModel").unwrap();
    assert_eq!(model["@type"], "card");
    assert_eq!(model["callToAction"]["label"], "Read more");
    assert_eq!(decoded, tree);
}

#[test]
fn test_unknown_type_round_trips_through_the_fallback() {
    let tree = single(
        "x",
        json!({"@type": "fancyWidget", "caption": "Hello", "size": 3}),
    );
    let html = assert_stable(&tree);
    assert!(html.contains(r#"<div data-fieldname="caption">Hello</div>"#));
}

#[test]
fn test_placeholders_inside_rich_text_render_nothing() {
    let tree = single(
        "b1",
        json!({
            "@type": "slate",
            "plaintext": "beforeafter",
            "value": [{"type": "p", "children": [
                {"text": "before"},
                {"type": "voltoblock", "data": {"@type": "maps", "url": "/map"}, "children": [{"text": ""}]},
                {"text": "after"}
            ]}]
        }),
    );
    let html = volto_babel::blocks_to_html(&tree).unwrap();
    assert!(html.contains("<p>beforeafter</p>"), "got {html}");
    assert!(!html.contains("voltoblock"));
    assert!(!html.contains("data-slate-data"));
}
