//! Legacy widget markup and annotated block markup → blocks.

use crate::common::{to_blocks, types};
use volto_babel::{BlockTree, DiagnosticKind};

fn titles(tree: &BlockTree) -> Vec<String> {
    tree.ordered()
        .iter()
        .map(|(_, column)| column.get_str("title").unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_tabs_become_a_tabs_block() {
    let (tree, diagnostics) = to_blocks(
        r##"<ul class="nav nav-tabs"><li><a href="#one"> First </a></li><li><a href="#two">Second</a></li></ul><div class="tab-content"><div id="one"><p>Alpha</p></div><div id="two"><p>Beta</p><p>Gamma</p></div></div>"##,
    );
    assert!(diagnostics.is_empty());
    assert_eq!(types(&tree), vec!["tabs_block"]);

    let (_, tabs) = tree.ordered()[0];
    let panels = BlockTree::from_value(tabs.get("data").unwrap());
    assert_eq!(titles(&panels), vec!["First", "Second"]);
    let (_, second) = panels.ordered()[1];
    assert_eq!(second.block_type(), Some("tab"));
    assert_eq!(second.nested_tree().len(), 2);
}

#[test]
fn test_tab_pointing_nowhere_is_reported() {
    let (tree, diagnostics) = to_blocks(
        r##"<ul class="nav nav-tabs"><li><a href="#gone">Gone</a></li></ul><div class="tab-content"></div>"##,
    );
    assert_eq!(types(&tree), vec!["tabs_block"]);
    assert!(diagnostics.has(DiagnosticKind::MalformedMarkup));
}

#[test]
fn test_accordion_panels() {
    let (tree, _) = to_blocks(
        r#"<div class="panel-group"><div class="panel"><h4 class="panel-title">Symptoms</h4><div class="panel-body"><p>Heat stroke</p></div></div><div class="panel"><h4 class="panel-title">Prevention</h4><div class="panel-body"><p>Drink water</p></div></div></div>"#,
    );
    assert_eq!(types(&tree), vec!["accordion"]);
    let (_, accordion) = tree.ordered()[0];
    assert_eq!(accordion.get_str("non_exclusive"), Some("true"));
    let panels = BlockTree::from_value(accordion.get("data").unwrap());
    assert_eq!(titles(&panels), vec!["Symptoms", "Prevention"]);
    let (_, first) = panels.ordered()[0];
    let inner = first.nested_tree();
    assert_eq!(inner.ordered()[0].1.get_str("plaintext"), Some("Heat stroke"));
}

#[test]
fn test_video_with_source_child() {
    let (tree, _) = to_blocks(r#"<video controls><source src="/clip.mp4" type="video/mp4"></video>"#);
    assert_eq!(types(&tree), vec!["nextCloudVideo"]);
    assert_eq!(tree.ordered()[0].1.get_str("url"), Some("/clip.mp4"));
}

#[test]
fn test_blue_button_becomes_call_to_action() {
    let (tree, _) = to_blocks(r#"<p><a class="bluebutton" href="/report" target="_blank">Read the report</a></p>"#);
    assert_eq!(types(&tree), vec!["callToActionBlock"]);
    let (_, button) = tree.ordered()[0];
    assert_eq!(button.get_str("text"), Some("Read the report"));
    assert_eq!(button.get_str("href"), Some("/report"));
    assert_eq!(button.get_str("target"), Some("_blank"));
}

#[test]
fn test_read_more_toggle() {
    let (tree, _) = to_blocks(r##"<p>Intro</p><a class="accordion-toggle" href="#more">Read more</a>"##);
    let kinds = types(&tree);
    assert_eq!(kinds.last().map(String::as_str), Some("readMoreBlock"));
    assert_eq!(tree.ordered().last().unwrap().1.get_str("label_opened"), Some("Read less"));
}

#[test]
fn test_annotated_hero() {
    let (tree, _) = to_blocks(
        r#"<div data-block-type="hero" data-volto-block='{"fullWidth": true, "data": {"text": "kept"}}'><div data-fieldname="buttonLabel">Explore</div><div data-fieldname="copyright">EEA</div><div data-volto-section="blocks"><h2>Inside the hero</h2></div></div>"#,
    );
    assert_eq!(types(&tree), vec!["hero"]);
    let (_, hero) = tree.ordered()[0];
    assert_eq!(hero.get_str("buttonLabel"), Some("Explore"));
    assert_eq!(hero.get_str("copyright"), Some("EEA"));
    assert_eq!(hero.get("fullWidth"), Some(&serde_json::json!(true)));

    let data = hero.get("data").unwrap();
    assert_eq!(data["text"], "kept");
    let inner = BlockTree::from_value(data);
    assert_eq!(inner.ordered()[0].1.get_str("plaintext"), Some("Inside the hero"));
}

#[test]
fn test_annotated_grid_of_teasers() {
    let (tree, _) = to_blocks(
        r#"<div data-block-type="gridBlock" data-volto-block='{"gridSize": 12}'><div data-block-type="teaser" data-volto-block='{"href": "/a"}'><div data-fieldname="title">A</div></div><div data-block-type="teaser" data-volto-block='{"href": "/b"}'><div data-fieldname="title">B</div></div></div>"#,
    );
    assert_eq!(types(&tree), vec!["gridBlock"]);
    let (_, grid) = tree.ordered()[0];
    assert_eq!(grid.get("gridSize"), Some(&serde_json::json!(12)));
    let teasers = grid.nested_tree();
    assert_eq!(types(&teasers), vec!["teaser", "teaser"]);
    let titles: Vec<_> = teasers
        .ordered()
        .iter()
        .map(|(_, teaser)| teaser.get_str("title").unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["A", "B"]);
}
