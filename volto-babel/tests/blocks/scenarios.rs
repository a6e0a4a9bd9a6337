//! Authored HTML → blocks: the shapes editors rely on.

use crate::common::{converter, to_blocks, types};
use serde_json::json;
use volto_babel::{BlockTree, ConvertError, Diagnostics};

#[test]
fn test_link_wrapped_image_becomes_image_block() {
    let (tree, diagnostics) = to_blocks(r#"<p><a href="resolveuid/X"><img src="a.jpg"/></a></p>"#);
    assert_eq!(types(&tree), vec!["image"]);
    let (_, image) = tree.ordered()[0];
    assert_eq!(image.get_str("url"), Some("a.jpg"));
    assert_eq!(image.get("href"), Some(&json!([{"@id": "../resolveuid/X"}])));
    assert!(diagnostics.is_empty());
}

#[test]
fn test_plain_link_on_image_stays_a_string() {
    let (tree, _) = to_blocks(r#"<p><a href="https://example.org"><img src="/b.png"></a></p>"#);
    let (_, image) = tree.ordered()[0];
    assert_eq!(image.get_str("href"), Some("https://example.org"));
}

#[test]
fn test_table_with_widgets_becomes_columns() {
    let (tree, _) = to_blocks(
        r#"<table><tbody><tr><td><iframe src="/a"></iframe></td><td><iframe src="/b"></iframe></td></tr></tbody></table>"#,
    );
    assert_eq!(types(&tree), vec!["columnsBlock"]);
    let (_, columns) = tree.ordered()[0];
    assert_eq!(columns.get("gridCols"), Some(&json!(["halfWidth", "halfWidth"])));
    assert_eq!(columns.get("gridSize"), Some(&json!(12)));

    let data = BlockTree::from_value(columns.get("data").unwrap());
    let urls: Vec<String> = data
        .ordered()
        .iter()
        .map(|(_, column)| {
            let inner = column.nested_tree();
            let (_, maps) = inner.ordered()[0];
            assert_eq!(maps.block_type(), Some("maps"));
            maps.get_str("url").unwrap().to_string()
        })
        .collect();
    assert_eq!(urls, vec!["/a", "/b"]);
}

#[test]
fn test_three_cells_are_one_third_each() {
    let cell = r#"<td><iframe src="/m"></iframe></td>"#;
    let (tree, _) = to_blocks(&format!("<table><tr>{cell}{cell}{cell}</tr></table>"));
    let (_, columns) = tree.ordered()[0];
    assert_eq!(
        columns.get("gridCols"),
        Some(&json!(["oneThird", "oneThird", "oneThird"]))
    );
}

#[test]
fn test_row_without_width_is_an_error() {
    let cell = r#"<td><iframe src="/m"></iframe></td>"#;
    let html = format!("<table><tr>{}</tr></table>", cell.repeat(7));
    let result = converter().html_to_blocks(&html, &mut Diagnostics::new());
    assert!(matches!(result, Err(ConvertError::MissingColumnWidth(1))));
}

#[test]
fn test_data_table_becomes_slate_table() {
    let (tree, _) = to_blocks(
        "<table class=\"listing\"><thead><tr><th>Year</th><th>Cases</th></tr></thead>\
         <tbody><tr><td>2020</td><td><strong>12</strong></td></tr></tbody></table>",
    );
    assert_eq!(types(&tree), vec!["slateTable"]);
    let (_, table) = tree.ordered()[0];
    assert_eq!(table.get_str("plaintext"), Some("YearCases202012"));
    let data = table.get("table").unwrap();
    assert_eq!(data["striped"], json!(true));
    assert_eq!(data["rows"].as_array().unwrap().len(), 2);
    assert_eq!(data["rows"][0]["cells"][1]["type"], "header");
    assert_eq!(
        data["rows"][1]["cells"][1]["value"],
        json!([{"type": "p", "children": [{"type": "strong", "children": [{"text": "12"}]}]}])
    );
}

#[test]
fn test_read_more_accordion_yields_no_accordion() {
    let (tree, _) = to_blocks(
        r#"<div class="panel-group"><div class="panel"><h4 class="panel-title">Read more</h4><div class="panel-body"><p>Hidden</p></div></div></div>"#,
    );
    assert!(!types(&tree).contains(&"accordion".to_string()));
    assert!(types(&tree).iter().all(|t| t == "slate"));
}

#[test]
fn test_top_level_inline_content_is_wrapped_in_a_paragraph() {
    let (tree, _) = to_blocks("loose <em>text</em>");
    let (_, block) = tree.ordered()[0];
    assert_eq!(block.get("value").unwrap()[0]["type"], "p");
    assert_eq!(block.get_str("plaintext"), Some("loose text"));
}

#[test]
fn test_layout_order_follows_the_document() {
    let (tree, _) = to_blocks("<h2>A</h2><p>B</p><h3>C</h3>");
    let texts: Vec<_> = tree
        .ordered()
        .iter()
        .map(|(_, block)| block.get_str("plaintext").unwrap().to_string())
        .collect();
    assert_eq!(texts, vec!["A", "B", "C"]);
    assert_eq!(tree.blocks_layout.items, vec!["id-1", "id-2", "id-3"]);
}
