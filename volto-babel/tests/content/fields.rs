//! Reading annotated documents back into content fields.

use crate::common::converter;
use volto_babel::{annotated_html_to_content, ContentField, Diagnostics};

#[test]
fn test_text_fields_and_blocks() {
    let html = r#"<div data-field="title">Heat and health</div>
<div data-field="description">Effects of <em>heat</em> on people</div>
<div data-field="blocks"><div data-block-type="slate" data-block-uid="b1" data-volto-block="{}"><p>Body</p></div></div>"#;
    let content = annotated_html_to_content(html).unwrap();

    assert_eq!(
        content.get("title"),
        Some(&ContentField::Text("Heat and health".to_string()))
    );
    assert_eq!(
        content.get("description"),
        Some(&ContentField::Text("Effects of heat on people".to_string()))
    );
    let Some(ContentField::Blocks(tree)) = content.get("blocks") else {
        panic!("blocks field missing");
    };
    assert_eq!(tree.blocks_layout.items, vec!["b1"]);
    assert_eq!(tree.ordered()[0].1.get_str("plaintext"), Some("Body"));
}

#[test]
fn test_elements_without_field_are_ignored() {
    let content = annotated_html_to_content(r#"<p>stray</p><div data-field="title">T</div>"#).unwrap();
    assert_eq!(content.len(), 1);
}

#[test]
fn test_markup_without_block_type_is_converted_as_html() {
    let mut diagnostics = Diagnostics::new();
    let content = converter()
        .annotated_html_to_content(
            r#"<div data-field="blocks"><p>Translated paragraph</p><p><iframe src="/m"></iframe></p></div>"#,
            &mut diagnostics,
        )
        .unwrap();
    let Some(ContentField::Blocks(tree)) = content.get("blocks") else {
        panic!("blocks field missing");
    };
    let types: Vec<_> = tree
        .ordered()
        .iter()
        .map(|(_, block)| block.block_type().unwrap().to_string())
        .collect();
    assert_eq!(types, vec!["slate", "maps"]);
}

#[test]
fn test_content_serializes_as_plain_json() {
    let content = annotated_html_to_content(
        r#"<div data-field="title">T</div><div data-field="blocks"></div>"#,
    )
    .unwrap();
    assert_eq!(
        serde_json::to_value(&content).unwrap(),
        serde_json::json!({
            "blocks": {"blocks": {}, "blocks_layout": {"items": []}},
            "title": "T"
        })
    );
}
