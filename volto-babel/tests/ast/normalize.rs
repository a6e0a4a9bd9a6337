//! Structural invariants of parsed values, over generated markup.

use proptest::prelude::*;
use volto_babel::{html_to_ast, Node, Settings};

const BLOCK_TAGS: &[&str] = &["p", "h2", "blockquote", "div", "ul", "li"];
const INLINE_TAGS: &[&str] = &["strong", "em", "span", "a", "code", "u"];

fn markup() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        "[a-z]{1,5}( [a-z]{1,5})?",
        Just(" ".to_string()),
        Just("<br>".to_string()),
        Just("<img src=\"/a.png\">".to_string()),
    ];
    leaf.prop_recursive(4, 24, 4, |inner| {
        let children = prop::collection::vec(inner, 0..4).prop_map(|parts| parts.concat());
        prop_oneof![
            (prop::sample::select(BLOCK_TAGS), children.clone())
                .prop_map(|(tag, body)| format!("<{tag}>{body}</{tag}>")),
            (prop::sample::select(INLINE_TAGS), children.clone())
                .prop_map(|(tag, body)| format!("<{tag}>{body}</{tag}>")),
            children,
        ]
    })
}

fn check_element(node: &Node) -> Result<(), String> {
    let Node::Element(element) = node else {
        return Ok(());
    };
    if element.children.is_empty() {
        return Err(format!("'{}' has no children", element.kind));
    }
    for pair in element.children.windows(2) {
        if let (Node::Text(a), Node::Text(b)) = (&pair[0], &pair[1]) {
            return Err(format!(
                "'{}' has adjacent text leaves {:?} and {:?}",
                element.kind, a.text, b.text
            ));
        }
    }
    element.children.iter().try_for_each(check_element)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_parsed_values_are_normalized(body in markup()) {
        let settings = Settings::default();
        let nodes = html_to_ast(&body).unwrap();
        for node in &nodes {
            match node {
                Node::Text(text) => prop_assert!(false, "top-level text leaf {:?}", text.text),
                Node::Element(element) => prop_assert!(
                    !settings.is_inline_type(&element.kind),
                    "top-level inline '{}' in {}", element.kind, body
                ),
            }
            if let Err(message) = check_element(node) {
                prop_assert!(false, "{} in {}", message, body);
            }
        }
    }
}

#[test]
fn test_top_level_inline_content_is_wrapped() {
    let nodes = html_to_ast("loose <em>text</em><h2>Heading</h2>tail").unwrap();
    let kinds: Vec<_> = nodes.iter().map(|n| n.kind().unwrap_or("text")).collect();
    assert_eq!(kinds, vec!["p", "h2", "p"]);
}

#[test]
fn test_empty_elements_get_an_empty_leaf() {
    let nodes = html_to_ast("<p></p>").unwrap();
    assert_eq!(
        serde_json::to_value(&nodes).unwrap(),
        serde_json::json!([{"type": "p", "children": [{"text": ""}]}])
    );
}
