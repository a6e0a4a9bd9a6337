//! Slate rich-text AST
//!
//! A rich-text value is a list of [`Node`]s. Text leaves carry their string
//! plus optional marks; elements carry a `type`, children and any extra
//! fields. The JSON shape is the one the CMS editor stores:
//!
//! ```json
//! [{"type": "p", "children": [{"text": "Hello "}, {"type": "link", "data": {"url": "/x"}, "children": [{"text": "world"}]}]}]
//! ```
//!
//! Submodules convert between HTML and this AST:
//!
//! - [`whitespace`]: browser-like collapsing of inline whitespace
//! - [`deserializer`]: HTML → AST
//! - [`serializer`]: AST → HTML
//! - [`normalize`]: structural clean-up applied to every parsed value

pub mod deserializer;
pub mod normalize;
pub mod serializer;
pub mod whitespace;

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use deserializer::HtmlDeserializer;
pub use serializer::HtmlSerializer;

/// A rich-text node: either a text leaf or an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Text(TextNode),
    Element(ElementNode),
}

/// Text leaf with optional marks (`bold`, `italic`, ...)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextNode {
    pub text: String,
    #[serde(flatten)]
    pub marks: Map<String, Value>,
}

/// Element with a type, children and arbitrary extra fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(TextNode {
            text: text.into(),
            marks: Map::new(),
        })
    }

    pub fn element(kind: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Element(ElementNode::new(kind, children))
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Element type, `None` for text leaves.
    pub fn kind(&self) -> Option<&str> {
        self.as_element().map(|e| e.kind.as_str())
    }

    /// The node as a JSON value without its children.
    pub fn to_stub(&self) -> Map<String, Value> {
        match self {
            Node::Text(text) => text.marks.clone(),
            Node::Element(element) => element.to_stub(),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Node::Text(text) => {
                let mut map = Map::new();
                map.insert("text".to_string(), Value::String(text.text.clone()));
                map.extend(text.marks.clone());
                Value::Object(map)
            }
            Node::Element(element) => {
                let mut map = element.to_stub();
                map.insert("children".to_string(), to_value(&element.children));
                Value::Object(map)
            }
        }
    }
}

impl ElementNode {
    pub fn new(kind: impl Into<String>, children: Vec<Node>) -> Self {
        ElementNode {
            kind: kind.into(),
            children,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Type and extra fields, children left out.
    pub fn to_stub(&self) -> Map<String, Value> {
        let mut stub = Map::new();
        stub.insert("type".to_string(), Value::String(self.kind.clone()));
        stub.extend(self.fields.clone());
        stub
    }
}

/// A rich-text value as a JSON array.
pub fn to_value(nodes: &[Node]) -> Value {
    Value::Array(nodes.iter().map(Node::to_value).collect())
}

/// Read a rich-text value out of a block field.
pub fn from_value(value: &Value) -> Result<Vec<Node>, ConvertError> {
    Vec::<Node>::deserialize(value)
        .map_err(|e| ConvertError::InvalidBlock(format!("malformed rich text: {e}")))
}
