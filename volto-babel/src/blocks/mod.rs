//! Block trees
//!
//! A page body is a [`BlockTree`]: a map from block id to [`Block`] payload
//! plus an ordered layout listing the ids. Container blocks (columns, tabs,
//! accordions, grids, heroes) nest further trees inside their payload, using
//! the same `{blocks, blocks_layout: {items}}` shape.
//!
//! - [`preprocess`]: rewrites widget markup into placeholders before parsing
//! - [`extract`]: turns a rich-text value into blocks
//! - [`pipeline`]: HTML → blocks, tying the two together

pub mod extract;
pub mod pipeline;
pub mod preprocess;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A block payload: a JSON object with an `@type` and type-specific fields
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Block(Map<String, Value>);

impl Block {
    pub fn new(block_type: &str) -> Self {
        let mut map = Map::new();
        map.insert("@type".to_string(), Value::String(block_type.to_string()));
        Block(map)
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Block(map)
    }

    /// A block from a JSON value; `None` unless it is an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(|map| Block(map.clone()))
    }

    pub fn block_type(&self) -> Option<&str> {
        self.0.get("@type").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// The tree stored directly in this payload (`blocks` + `blocks_layout`).
    pub fn nested_tree(&self) -> BlockTree {
        BlockTree::from_map(&self.0)
    }

    /// Copy of the payload without the given keys.
    pub fn without(&self, keys: &[&str]) -> Map<String, Value> {
        self.0
            .iter()
            .filter(|(key, _)| !keys.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Copy of the payload without `@type` and the given keys.
    pub fn residual(&self, consumed: &[&str]) -> Map<String, Value> {
        self.0
            .iter()
            .filter(|(key, _)| key.as_str() != "@type" && !consumed.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl From<Map<String, Value>> for Block {
    fn from(map: Map<String, Value>) -> Self {
        Block(map)
    }
}

/// Ordered list of block ids
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlocksLayout {
    #[serde(default)]
    pub items: Vec<String>,
}

/// Blocks keyed by id plus their display order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockTree {
    #[serde(default)]
    pub blocks: BTreeMap<String, Block>,
    #[serde(default)]
    pub blocks_layout: BlocksLayout,
}

impl BlockTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from `(id, block)` pairs, keeping their order.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, Block)>) -> Self {
        let mut tree = Self::new();
        for (id, block) in pairs {
            tree.push(id, block);
        }
        tree
    }

    pub fn push(&mut self, id: String, block: Block) {
        self.blocks_layout.items.push(id.clone());
        self.blocks.insert(id, block);
    }

    pub fn len(&self) -> usize {
        self.blocks_layout.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks_layout.items.is_empty()
    }

    /// Blocks in layout order; ids with no block yield `None`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Block>)> {
        self.blocks_layout
            .items
            .iter()
            .map(|id| (id.as_str(), self.blocks.get(id)))
    }

    /// Blocks in layout order, skipping dangling ids.
    pub fn ordered(&self) -> Vec<(&str, &Block)> {
        self.iter()
            .filter_map(|(id, block)| block.map(|b| (id, b)))
            .collect()
    }

    /// Read a nested tree out of a payload value, leniently.
    ///
    /// Anything that is not shaped like a tree reads as an empty one.
    pub fn from_value(value: &Value) -> Self {
        value.as_object().map(Self::from_map).unwrap_or_default()
    }

    pub fn from_map(map: &Map<String, Value>) -> Self {
        let blocks = map
            .get("blocks")
            .and_then(Value::as_object)
            .map(|blocks| {
                blocks
                    .iter()
                    .filter_map(|(id, block)| Block::from_value(block).map(|b| (id.clone(), b)))
                    .collect()
            })
            .unwrap_or_default();
        let items = map
            .get("blocks_layout")
            .and_then(|layout| layout.get("items"))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|id| id.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        BlockTree {
            blocks,
            blocks_layout: BlocksLayout { items },
        }
    }

    /// The tree as a `{blocks, blocks_layout}` JSON object.
    pub fn to_map(&self) -> Map<String, Value> {
        let blocks: Map<String, Value> = self
            .blocks
            .iter()
            .map(|(id, block)| (id.clone(), Value::Object(block.as_map().clone())))
            .collect();
        let items = self
            .blocks_layout
            .items
            .iter()
            .cloned()
            .map(Value::String)
            .collect();

        let mut layout = Map::new();
        layout.insert("items".to_string(), Value::Array(items));

        let mut map = Map::new();
        map.insert("blocks".to_string(), Value::Object(blocks));
        map.insert("blocks_layout".to_string(), Value::Object(layout));
        map
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }
}

/// Keys a nested tree occupies inside a payload object.
pub const TREE_KEYS: &[&str] = &["blocks", "blocks_layout"];
