//! A whole legacy page through the authored-HTML path.

use crate::common::{fixture, round_trip, to_blocks, types};
use volto_babel::BlockTree;

#[test]
fn test_legacy_page_blocks() {
    let (tree, diagnostics) = to_blocks(&fixture("legacy_page.html"));
    assert!(diagnostics.is_empty(), "{:?}", diagnostics.entries());
    assert_eq!(
        types(&tree),
        vec!["slate", "slate", "maps", "tabs_block", "callToActionBlock"]
    );

    let (_, intro) = tree.ordered()[1];
    assert_eq!(
        intro.get_str("plaintext"),
        Some("Rising temperatures affect everyone, but not equally.")
    );

    let (_, tabs) = tree.ordered()[3];
    let panels = BlockTree::from_value(tabs.get("data").unwrap());
    let (_, data_tab) = panels.ordered()[1];
    let inner = data_tab.nested_tree();
    assert_eq!(types(&inner), vec!["slateTable"]);
    let (_, table) = inner.ordered()[0];
    assert_eq!(table.get("table").unwrap()["striped"], serde_json::json!(true));
}

#[test]
fn test_legacy_page_survives_annotated_round_trip() {
    let (tree, _) = to_blocks(&fixture("legacy_page.html"));
    let (html, decoded) = round_trip(&tree);
    assert!(html.contains(r#"data-block-type="tabs_block""#));
    assert!(html.contains("Heat waves are the deadliest weather events in Europe."));
    assert_eq!(decoded, tree);
}
