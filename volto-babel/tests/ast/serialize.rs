//! HTML → rich text → HTML through the free functions.

use serde_json::json;
use volto_babel::{ast_to_html, html_to_ast};

#[test]
fn test_plain_markup_survives_unchanged() {
    let html = r#"<h2>Title</h2><p>Text with <strong>bold</strong> and <a href="/x">a link</a>.</p><ul><li>one</li><li>two</li></ul>"#;
    let nodes = html_to_ast(html).unwrap();
    assert_eq!(ast_to_html(&nodes).unwrap(), html);
}

#[test]
fn test_link_and_image_shapes() {
    let nodes = html_to_ast(
        r#"<p><a href="/page">go</a> <img src="/pic.jpg/@@images/image/large" alt="Pic" style="float: right"></p>"#,
    )
    .unwrap();
    let value = serde_json::to_value(&nodes).unwrap();
    assert_eq!(value[0]["children"][0]["data"], json!({"url": "/page"}));
    let image = &value[0]["children"][2];
    assert_eq!(image["type"], "img");
    assert_eq!(image["url"], "/pic.jpg");
    assert_eq!(image["scale"], "huge");
    assert_eq!(image["align"], "right");
    assert_eq!(image["alt"], "Pic");
}

#[test]
fn test_reserved_attribute_names_are_prefixed() {
    let nodes = html_to_ast(r#"<p><code type="shell">ls</code></p>"#).unwrap();
    let value = serde_json::to_value(&nodes).unwrap();
    assert_eq!(value[0]["children"][0]["type"], "code");
    assert_eq!(value[0]["children"][0]["_type"], "shell");

    let back = html_to_ast(&ast_to_html(&nodes).unwrap()).unwrap();
    assert_eq!(back, nodes);
}

#[test]
fn test_breaks_become_newlines_and_back() {
    let nodes = html_to_ast("<p>one<br>two</p>").unwrap();
    assert_eq!(
        serde_json::to_value(&nodes).unwrap(),
        json!([{"type": "p", "children": [{"text": "one\ntwo"}]}])
    );
    assert_eq!(ast_to_html(&nodes).unwrap(), "<p>one<br>two</p>");
}
