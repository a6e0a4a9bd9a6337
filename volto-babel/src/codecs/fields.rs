//! Codecs for flat payloads
//!
//! Translatable strings become `<div data-fieldname>` children of the
//! wrapper; the rest of the payload rides along as residual JSON.

use crate::blocks::Block;
use crate::codec::{field_div, read_block, read_fields, to_json, wrapper, BlockCodec};
use crate::context::Context;
use crate::dom;
use crate::error::ConvertError;
use crate::markers::{BLOCK_DATA, BLOCK_TYPE, BLOCK_UID, FIELD_NAME};
use markup5ever_rcdom::Handle;
use serde_json::{Map, Value};

/// Which payload fields are rendered as text
#[derive(Debug, Clone, Copy)]
pub enum Translatable {
    /// The listed fields, when they hold strings
    Named(&'static [&'static str]),
    /// Every top-level string field
    AllStrings,
}

/// Block with a few translatable string fields
///
/// Also serves as the fallback for block types without a codec, in which
/// case every top-level string is treated as translatable.
pub struct FieldsCodec {
    name: &'static str,
    translatable: Translatable,
}

impl FieldsCodec {
    pub fn new(name: &'static str, fields: &'static [&'static str]) -> Self {
        FieldsCodec {
            name,
            translatable: Translatable::Named(fields),
        }
    }

    /// The fallback codec: no name, all strings translatable.
    pub fn generic() -> Self {
        FieldsCodec {
            name: "",
            translatable: Translatable::AllStrings,
        }
    }

    fn text_fields<'b>(&self, block: &'b Block) -> Vec<(&'b str, &'b str)> {
        let map = block.as_map();
        match self.translatable {
            Translatable::Named(names) => names
                .iter()
                .filter_map(|name| map.get(*name).and_then(Value::as_str).map(|text| (*name, text)))
                .collect(),
            Translatable::AllStrings => map
                .iter()
                .filter(|(key, _)| key.as_str() != "@type")
                .filter_map(|(key, value)| value.as_str().map(|text| (key.as_str(), text)))
                .collect(),
        }
    }
}

impl BlockCodec for FieldsCodec {
    fn name(&self) -> &str {
        self.name
    }

    fn encode(
        &self,
        id: &str,
        block: &Block,
        _ctx: &mut Context<'_>,
    ) -> Result<Vec<Handle>, ConvertError> {
        let fields = self.text_fields(block);
        let consumed: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
        let block_type = block.block_type().unwrap_or(self.name);

        let div = wrapper(block_type, id, &block.residual(&consumed))?;
        dom::append_all(&div, fields.iter().map(|(name, text)| field_div(name, text)));
        Ok(vec![div])
    }

    fn decode(&self, fragment: &Handle, _ctx: &mut Context<'_>) -> Result<Block, ConvertError> {
        let mut block = read_block(fragment)?;
        for (name, text) in read_fields(fragment) {
            block.insert(&name, text);
        }
        Ok(block)
    }
}

/// `image`: a real `<img>` carrying the whole payload
pub struct ImageCodec;

impl BlockCodec for ImageCodec {
    fn name(&self) -> &str {
        "image"
    }

    fn encode(
        &self,
        id: &str,
        block: &Block,
        _ctx: &mut Context<'_>,
    ) -> Result<Vec<Handle>, ConvertError> {
        let json = to_json(&block.residual(&[]))?;
        let src = block.get_str("url").unwrap_or_default();
        let mut attrs = vec![("src", src), (BLOCK_TYPE, "image")];
        if !id.is_empty() {
            attrs.push((BLOCK_UID, id));
        }
        attrs.push((BLOCK_DATA, json.as_str()));
        Ok(vec![dom::create_element("img", &attrs)])
    }

    fn decode(&self, fragment: &Handle, _ctx: &mut Context<'_>) -> Result<Block, ConvertError> {
        read_block(fragment)
    }
}

/// `title`: the subtitle and the descriptions of the info items are text
pub struct TitleCodec;

const SUBTITLE: &str = "subtitle";
const INFO: &str = "info";

impl BlockCodec for TitleCodec {
    fn name(&self) -> &str {
        "title"
    }

    fn encode(
        &self,
        id: &str,
        block: &Block,
        _ctx: &mut Context<'_>,
    ) -> Result<Vec<Handle>, ConvertError> {
        let subtitle = block.get_str(SUBTITLE);
        let info = block.get(INFO).and_then(Value::as_array);

        let mut consumed = Vec::new();
        if subtitle.is_some() {
            consumed.push(SUBTITLE);
        }
        if info.is_some() {
            consumed.push(INFO);
        }
        let div = wrapper("title", id, &block.residual(&consumed))?;

        if let Some(items) = info {
            let list = dom::create_element("div", &[(FIELD_NAME, INFO)]);
            for item in items {
                let item_id = item.get("@id").and_then(Value::as_str).unwrap_or_default();
                let description = item
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let rest: Map<String, Value> = item
                    .as_object()
                    .map(|map| {
                        map.iter()
                            .filter(|(key, _)| *key != "@id" && *key != "description")
                            .map(|(key, value)| (key.clone(), value.clone()))
                            .collect()
                    })
                    .unwrap_or_default();
                let json = to_json(&rest)?;
                dom::append(
                    &list,
                    dom::element_with_text(
                        "div",
                        &[("id", item_id), (BLOCK_DATA, json.as_str())],
                        description,
                    ),
                );
            }
            dom::append(&div, list);
        }
        if let Some(subtitle) = subtitle {
            dom::append(&div, field_div(SUBTITLE, subtitle));
        }
        Ok(vec![div])
    }

    fn decode(&self, fragment: &Handle, _ctx: &mut Context<'_>) -> Result<Block, ConvertError> {
        let mut block = read_block(fragment)?;
        for child in dom::element_children(fragment) {
            match dom::attr(&child, FIELD_NAME).as_deref() {
                Some(INFO) => {
                    let mut items = Vec::new();
                    for entry in dom::element_children(&child) {
                        let mut item = dom::json_object_attr(&entry, BLOCK_DATA)?;
                        item.insert(
                            "@id".to_string(),
                            Value::String(dom::attr(&entry, "id").unwrap_or_default()),
                        );
                        item.insert(
                            "description".to_string(),
                            Value::String(dom::text_content(&entry)),
                        );
                        items.push(Value::Object(item));
                    }
                    block.insert(INFO, Value::Array(items));
                }
                Some(name) => block.insert(name, dom::text_content(&child)),
                None => {}
            }
        }
        Ok(block)
    }
}
