//! Teaser codecs
//!
//! A teaser renders its title fields as text. Its item model gets its own
//! `<div data-model-type>` with the model's residual, and the model's call to
//! action a `<div data-volto-calltoaction>` around the translatable label.
//! The markup is the same one the teaser preprocessor recognises, so a
//! rendered teaser also converts back through the authored-HTML path.

use crate::blocks::preprocess::teaser_payload;
use crate::blocks::Block;
use crate::codec::{decode_fragment, encode_block, field_div, read_block, to_json, wrapper, BlockCodec};
use crate::context::Context;
use crate::dom;
use crate::error::ConvertError;
use crate::markers::{BLOCK_DATA, CALL_TO_ACTION, MODEL_TYPE};
use markup5ever_rcdom::Handle;
use serde_json::{Map, Value};

const TEASER_FIELDS: &[&str] = &["title", "head_title", "description"];
const ITEM_MODEL: &str = "itemModel";
const CALL_TO_ACTION_KEY: &str = "callToAction";
const LABEL: &str = "label";

fn without(map: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    map.iter()
        .filter(|(key, _)| !keys.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// `teaser`
pub struct TeaserCodec;

impl TeaserCodec {
    fn item_model(model: &Map<String, Value>) -> Result<Handle, ConvertError> {
        let model_type = model.get("@type").and_then(Value::as_str).unwrap_or_default();
        let call_to_action = model.get(CALL_TO_ACTION_KEY).and_then(Value::as_object);

        let mut hidden = vec!["@type"];
        if call_to_action.is_some() {
            hidden.push(CALL_TO_ACTION_KEY);
        }
        let json = to_json(&without(model, &hidden))?;
        let element = dom::create_element("div", &[(MODEL_TYPE, model_type), (BLOCK_DATA, json.as_str())]);

        if let Some(call_to_action) = call_to_action {
            let label = call_to_action.get(LABEL).and_then(Value::as_str);
            let hidden: &[&str] = if label.is_some() { &[LABEL] } else { &[] };
            let json = to_json(&without(call_to_action, hidden))?;
            let cta = dom::create_element("div", &[(CALL_TO_ACTION, json.as_str())]);
            if let Some(label) = label {
                dom::append(&cta, field_div(LABEL, label));
            }
            dom::append(&element, cta);
        }
        Ok(element)
    }
}

impl BlockCodec for TeaserCodec {
    fn name(&self) -> &str {
        "teaser"
    }

    fn encode(
        &self,
        id: &str,
        block: &Block,
        _ctx: &mut Context<'_>,
    ) -> Result<Vec<Handle>, ConvertError> {
        let fields: Vec<(&str, &str)> = TEASER_FIELDS
            .iter()
            .filter_map(|name| block.get_str(name).map(|text| (*name, text)))
            .collect();
        let model = block.get(ITEM_MODEL).and_then(Value::as_object);

        let mut consumed: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
        if model.is_some() {
            consumed.push(ITEM_MODEL);
        }

        let div = wrapper("teaser", id, &block.residual(&consumed))?;
        dom::append_all(&div, fields.iter().map(|(name, text)| field_div(name, text)));
        if let Some(model) = model {
            dom::append(&div, Self::item_model(model)?);
        }
        Ok(vec![div])
    }

    fn decode(&self, fragment: &Handle, _ctx: &mut Context<'_>) -> Result<Block, ConvertError> {
        teaser_payload(fragment)
    }
}

/// `teaserGrid`: each entry of `columns` in its own `<div>`
pub struct TeaserGridCodec;

impl BlockCodec for TeaserGridCodec {
    fn name(&self) -> &str {
        "teaserGrid"
    }

    fn encode(
        &self,
        id: &str,
        block: &Block,
        ctx: &mut Context<'_>,
    ) -> Result<Vec<Handle>, ConvertError> {
        let columns = block.get("columns").and_then(Value::as_array);
        let consumed: &[&str] = if columns.is_some() { &["columns"] } else { &[] };
        let div = wrapper("teaserGrid", id, &block.residual(consumed))?;

        for column in columns.into_iter().flatten() {
            let Some(teaser) = Block::from_value(column) else {
                return Err(ConvertError::InvalidBlock(format!(
                    "teaser grid '{id}' has a column that is not an object"
                )));
            };
            let element = dom::create_element("div", &[]);
            let nodes = ctx.nested(|ctx| encode_block(ctx, "", &teaser))?;
            dom::append_all(&element, nodes);
            dom::append(&div, element);
        }
        Ok(vec![div])
    }

    fn decode(&self, fragment: &Handle, ctx: &mut Context<'_>) -> Result<Block, ConvertError> {
        let mut block = read_block(fragment)?;
        let mut columns = Vec::new();
        for column in dom::element_children(fragment) {
            let Some(inner) = dom::element_children(&column).into_iter().next() else {
                continue;
            };
            let decoded = ctx.nested(|ctx| decode_fragment(ctx, &inner))?;
            columns.extend(decoded.into_iter().map(|(_, teaser)| teaser.into_value()));
        }
        block.insert("columns", Value::Array(columns));
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockTree;
    use crate::codec::{annotated_html_to_content, blocks_to_html, ContentField};
    use crate::diagnostics::Diagnostics;
    use crate::ids::SequentialIds;
    use crate::registry::CodecRegistry;
    use crate::settings::Settings;
    use serde_json::json;

    fn encode(block: &Block) -> String {
        let settings = Settings::default();
        let ids = SequentialIds::default();
        let registry = CodecRegistry::with_defaults();
        let mut diagnostics = Diagnostics::new();
        let mut ctx = Context::new(&settings, &ids, &registry, &mut diagnostics);
        blocks_to_html(&mut ctx, &BlockTree::from_pairs(vec![("t".to_string(), block.clone())]))
            .unwrap()
    }

    fn decode(html: &str) -> Block {
        let settings = Settings::default();
        let ids = SequentialIds::default();
        let registry = CodecRegistry::with_defaults();
        let mut diagnostics = Diagnostics::new();
        let mut ctx = Context::new(&settings, &ids, &registry, &mut diagnostics);
        let mut content =
            annotated_html_to_content(&mut ctx, &format!(r#"<div data-field="blocks">{html}</div>"#))
                .unwrap();
        let Some(ContentField::Blocks(tree)) = content.remove("blocks") else {
            panic!("no blocks field");
        };
        tree.ordered()[0].1.clone()
    }

    fn teaser() -> Block {
        serde_json::from_value(json!({
            "@type": "teaser",
            "title": "Heat",
            "description": "Heat waves and health",
            "href": [{"@id": "/heat", "title": "Heat"}],
            "styles": {"align": "left"},
            "itemModel": {
                "@type": "card",
                "hasImage": true,
                "callToAction": {"enabled": true, "label": "Read more"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn item_model_markup() {
        let html = encode(&teaser());
        assert!(html.contains(r#"<div data-fieldname="title">Heat</div>"#));
        assert!(html.contains(r#"<div data-model-type="card" data-volto-block="{&quot;hasImage&quot;:true}">"#));
        assert!(html.contains(
            r#"<div data-volto-calltoaction="{&quot;enabled&quot;:true}"><div data-fieldname="label">Read more</div></div>"#
        ));
    }

    #[test]
    fn teaser_round_trip() {
        let block = teaser();
        let decoded = decode(&encode(&block));
        assert_eq!(decoded.get("itemModel").unwrap()["@type"], "card");
        assert_eq!(decoded.get("itemModel").unwrap()["callToAction"]["label"], "Read more");
        assert_eq!(decoded, block);
    }

    #[test]
    fn model_without_type() {
        let block = Block::new("teaser").with("itemModel", json!({"hasDate": false}));
        let decoded = decode(&encode(&block));
        assert_eq!(decoded, block);
    }

    #[test]
    fn teaser_grid_round_trip() {
        let block: Block = serde_json::from_value(json!({
            "@type": "teaserGrid",
            "align": "",
            "columns": [
                {"@type": "teaser", "title": "One", "href": [{"@id": "/one"}], "id": "c1"},
                {"@type": "teaser", "title": "Two", "description": "Second", "id": "c2"}
            ]
        }))
        .unwrap();
        let html = encode(&block);
        assert!(html.starts_with(r#"<div data-block-type="teaserGrid""#));
        assert_eq!(decode(&html), block);
    }
}
