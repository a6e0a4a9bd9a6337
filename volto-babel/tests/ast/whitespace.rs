//! Whitespace collapsing, checked through the public parser.

use proptest::prelude::*;
use volto_babel::ast::whitespace::{collapse_inline_space, remove_space_before_after_endline};
use volto_babel::{dom, html_to_ast, Node, Settings};

fn paragraph_text(html: &str) -> String {
    let nodes = html_to_ast(html).expect("parse failed");
    let paragraph = nodes[0].as_element().expect("expected an element");
    paragraph
        .children
        .iter()
        .filter_map(|child| match child {
            Node::Text(text) => Some(text.text.clone()),
            Node::Element(_) => None,
        })
        .collect()
}

#[test]
fn test_runs_of_spaces_collapse() {
    assert_eq!(paragraph_text("<p>a  b</p>"), "a b");
    assert_eq!(paragraph_text("<p>a\t\tb</p>"), "a b");
}

#[test]
fn test_space_around_newlines_is_dropped() {
    assert_eq!(remove_space_before_after_endline("a \n b"), "a\nb");
}

#[test]
fn test_whitespace_between_blocks_disappears() {
    let settings = Settings::default();
    let document = dom::parse("<div><p>a</p>\n    <p>b</p></div>");
    let body = dom::body(&document).unwrap();
    let div = dom::element_children(&body).remove(0);
    let padding = dom::children(&div)
        .into_iter()
        .find(|n| !dom::is_element(n))
        .expect("padding text node");
    assert_eq!(collapse_inline_space(&padding, &settings), "");
}

#[test]
fn test_inline_boundaries_keep_one_space() {
    let nodes = html_to_ast("<p>Hello <strong>bold</strong> world</p>").unwrap();
    let value = serde_json::to_value(&nodes).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{"type": "p", "children": [
            {"text": "Hello "},
            {"type": "strong", "children": [{"text": "bold"}]},
            {"text": " world"}
        ]}])
    );
}

fn separator() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec![" ", "\t", "  "]), 1..4)
        .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn prop_words_are_separated_by_single_spaces(
        words in prop::collection::vec("[a-z]{1,6}", 1..8),
        seps in prop::collection::vec(separator(), 8),
        lead in separator(),
        trail in separator(),
    ) {
        let mut body = lead;
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                body.push_str(&seps[i - 1]);
            }
            body.push_str(word);
        }
        body.push_str(&trail);

        let text = paragraph_text(&format!("<p>{body}</p>"));
        prop_assert_eq!(text, words.join(" "));
    }
}
