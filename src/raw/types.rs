//! Serde types for raw content.

use crate::error::Result;
use crate::model::block::BlockType;
use crate::model::entity::EntityMutability;
use crate::model::DataMap;
use indexmap::IndexMap;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDraftContentState {
    pub blocks: Vec<RawDraftContentBlock>,
    #[serde(default)]
    pub entity_map: IndexMap<String, RawDraftEntity>,
}

impl RawDraftContentState {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One block. Tree documents nest blocks through `children`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDraftContentBlock {
    /// Empty keys are replaced with generated ones on import.
    #[serde(default)]
    pub key: String,
    #[serde(rename = "type", default)]
    pub block_type: BlockType,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub depth: usize,
    #[serde(default)]
    pub inline_style_ranges: Vec<InlineStyleRange>,
    #[serde(default)]
    pub entity_ranges: Vec<RawEntityRange>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: DataMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawDraftContentBlock>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineStyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: String,
}

/// An entity range. `key` indexes the document's entity map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntityRange {
    pub offset: usize,
    pub length: usize,
    #[serde(deserialize_with = "number_or_string")]
    pub key: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDraftEntity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub mutability: EntityMutability,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: DataMap,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<DataMap, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<DataMap>::deserialize(deserializer)?.unwrap_or_default())
}

fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct KeyVisitor;

    impl<'de> Visitor<'de> for KeyVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an entity key as a number or numeric string")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<u64, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<u64, E> {
            u64::try_from(value).map_err(|_| E::custom(format!("negative entity key {}", value)))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<u64, E> {
            value
                .parse()
                .map_err(|_| E::custom(format!("non-numeric entity key {:?}", value)))
        }
    }

    deserializer.deserialize_any(KeyVisitor)
}
