//! Converting between `ContentState` and raw content.

use super::ranges::{
    decode_entity_ranges, decode_inline_style_ranges, encode_entity_ranges,
    encode_inline_style_ranges,
};
use super::types::{RawDraftContentBlock, RawDraftContentState, RawDraftEntity};
use crate::error::{DraftError, Result};
use crate::exploration::tree::relink_tree;
use crate::gate;
use crate::keys::generate_random_key;
use crate::model::block::{BlockLinks, CharacterList, ContentBlock};
use crate::model::block_map::BlockMap;
use crate::model::character::CharacterMetadata;
use crate::model::content_state::ContentState;
use crate::model::entity::EntityStore;
use crate::model::selection::SelectionState;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// Encodes `content` as raw content.
///
/// Entities are renumbered `0..n` in order of first use; entities no block
/// refers to are left out. Tree content is emitted nested through
/// `children`, starting from the root blocks.
pub fn convert_to_raw(content: &ContentState) -> Result<RawDraftContentState> {
    let block_map = content.block_map();
    let mut storage_keys: IndexMap<String, u64> = IndexMap::new();

    let is_tree = block_map.first().is_some_and(|b| b.is_tree_block());
    let blocks = if is_tree {
        block_map
            .iter()
            .filter(|block| block.parent_key().is_none())
            .map(|root| encode_tree_block(root, block_map, &mut storage_keys))
            .collect()
    } else {
        block_map
            .iter()
            .map(|block| encode_block(block, &mut storage_keys))
            .collect()
    };

    let mut entity_map = IndexMap::new();
    for (key, index) in &storage_keys {
        let entity = content.get_entity(key)?;
        entity_map.insert(
            index.to_string(),
            RawDraftEntity {
                entity_type: entity.entity_type().to_string(),
                mutability: entity.mutability(),
                data: entity.data().clone(),
            },
        );
    }

    Ok(RawDraftContentState { blocks, entity_map })
}

fn encode_block(
    block: &ContentBlock,
    storage_keys: &mut IndexMap<String, u64>,
) -> RawDraftContentBlock {
    RawDraftContentBlock {
        key: block.key().to_string(),
        block_type: block.block_type().clone(),
        text: block.text().to_string(),
        depth: block.depth(),
        inline_style_ranges: encode_inline_style_ranges(block),
        entity_ranges: encode_entity_ranges(block, storage_keys),
        data: block.data().clone(),
        children: None,
    }
}

fn encode_tree_block(
    block: &ContentBlock,
    block_map: &BlockMap,
    storage_keys: &mut IndexMap<String, u64>,
) -> RawDraftContentBlock {
    let mut raw = encode_block(block, storage_keys);
    raw.children = Some(
        block
            .child_keys()
            .iter()
            .filter_map(|key| block_map.get(key))
            .map(|child| encode_tree_block(child, block_map, storage_keys))
            .collect(),
    );
    raw
}

/// Decodes raw content into a new `ContentState` with its own entity store.
///
/// With tree data support on, blocks become tree blocks linked according to
/// their nesting; otherwise nested blocks are flattened in document order.
/// Blocks without a key get a generated one. An entity range naming a key
/// missing from the entity map is an error.
pub fn convert_from_raw(raw: &RawDraftContentState) -> Result<ContentState> {
    let store = Rc::new(EntityStore::new());
    let mut entity_keys: HashMap<u64, String> = HashMap::new();
    for (raw_key, entity) in &raw.entity_map {
        let index: u64 = raw_key
            .parse()
            .map_err(|_| DraftError::Raw(format!("Non-numeric entity map key: {}", raw_key)))?;
        let key = store.create(
            &entity.entity_type,
            entity.mutability,
            Some(entity.data.clone()),
        );
        entity_keys.insert(index, key);
    }

    let tree = gate::tree_data_support();
    let mut blocks = Vec::new();
    for block in &raw.blocks {
        decode_block(block, None, tree, &entity_keys, &mut blocks)?;
    }

    let block_map = if tree {
        let lineage = BlockMap::from_blocks(blocks.clone());
        relink_tree(blocks, &lineage)
    } else {
        BlockMap::from_blocks(blocks)
    };
    debug!(
        blocks = block_map.len(),
        entities = store.len(),
        tree,
        "decoded raw content"
    );

    let selection = block_map
        .first()
        .map(|block| SelectionState::create_empty(block.key()))
        .unwrap_or_default();
    Ok(ContentState::new(
        block_map,
        selection.clone(),
        selection,
        store,
    ))
}

fn decode_block(
    raw: &RawDraftContentBlock,
    parent: Option<&str>,
    tree: bool,
    entity_keys: &HashMap<u64, String>,
    out: &mut Vec<Rc<ContentBlock>>,
) -> Result<()> {
    let key = if raw.key.is_empty() {
        generate_random_key()
    } else {
        raw.key.clone()
    };

    let styles = decode_inline_style_ranges(&raw.text, &raw.inline_style_ranges);
    let entities = decode_entity_ranges(&raw.text, &raw.entity_ranges);
    let chars = styles
        .into_iter()
        .zip(entities)
        .map(|(style, entity)| {
            let entity = entity
                .map(|index| {
                    entity_keys.get(&index).cloned().ok_or_else(|| {
                        DraftError::Raw(format!(
                            "Block {} refers to unknown entity {}",
                            key, index
                        ))
                    })
                })
                .transpose()?;
            Ok(CharacterMetadata::create(style, entity))
        })
        .collect::<Result<CharacterList>>()?;

    let mut block = ContentBlock::new(key.as_str(), raw.block_type.clone(), "")
        .with_text(raw.text.as_str(), chars)
        .with_depth(raw.depth)
        .with_data(raw.data.clone());
    if tree {
        block = block.with_links(Some(BlockLinks {
            parent: parent.map(str::to_string),
            ..BlockLinks::default()
        }));
    }
    out.push(Rc::new(block));

    for child in raw.children.iter().flatten() {
        decode_block(child, Some(key.as_str()), tree, entity_keys, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::block::BlockType;
    use crate::model::entity::EntityMutability;
    use crate::testing::{sample_content_state, tree_content_state};
    use serde_json::json;

    #[test]
    fn test_sample_to_raw() {
        let raw = convert_to_raw(&sample_content_state()).unwrap();
        assert_eq!(raw.blocks.len(), 6);
        assert_eq!(raw.blocks[1].block_type, BlockType::UnorderedListItem);
        assert_eq!(raw.blocks[1].entity_ranges[0].key, 0);
        assert_eq!(raw.entity_map.len(), 1);
        let image = &raw.entity_map["0"];
        assert_eq!(image.entity_type, "IMAGE");
        assert_eq!(image.mutability, EntityMutability::Immutable);
    }

    #[test]
    fn test_round_trip_preserves_content() {
        let original = sample_content_state();
        let decoded = convert_from_raw(&convert_to_raw(&original).unwrap()).unwrap();
        assert_eq!(decoded.get_plain_text("\n"), original.get_plain_text("\n"));
        for (a, b) in original.block_map().iter().zip(decoded.block_map().iter()) {
            assert_eq!(a.key(), b.key());
            assert_eq!(a.block_type(), b.block_type());
            let styles_a: Vec<_> = a.character_list().iter().map(|c| c.style().clone()).collect();
            let styles_b: Vec<_> = b.character_list().iter().map(|c| c.style().clone()).collect();
            assert_eq!(styles_a, styles_b);
        }
        let entity_key = decoded.block("b").unwrap().entity_at(0).unwrap().to_string();
        assert_eq!(decoded.get_entity(&entity_key).unwrap().entity_type(), "IMAGE");
    }

    #[test]
    fn test_unknown_entity_is_error() {
        let raw: RawDraftContentState = serde_json::from_value(json!({
            "blocks": [{
                "key": "x",
                "text": "ab",
                "entityRanges": [{"offset": 0, "length": 1, "key": 4}]
            }],
            "entityMap": {}
        }))
        .unwrap();
        assert!(matches!(convert_from_raw(&raw), Err(DraftError::Raw(_))));
    }

    #[test]
    fn test_missing_keys_are_generated() {
        let raw: RawDraftContentState = serde_json::from_value(json!({
            "blocks": [{"text": "one"}, {"text": "two"}]
        }))
        .unwrap();
        let content = convert_from_raw(&raw).unwrap();
        let keys: Vec<&str> = content.block_map().keys().collect();
        assert_eq!(keys.len(), 2);
        assert!(keys.iter().all(|k| !k.is_empty()));
        assert_ne!(keys[0], keys[1]);
    }

    #[test]
    fn test_tree_to_raw_nests_children() {
        let raw = convert_to_raw(&tree_content_state()).unwrap();
        let roots: Vec<&str> = raw.blocks.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(roots, vec!["alpha", "container", "delta"]);
        let children: Vec<&str> = raw.blocks[1]
            .children
            .as_ref()
            .unwrap()
            .iter()
            .map(|b| b.key.as_str())
            .collect();
        assert_eq!(children, vec!["bravo", "charlie"]);
        assert_eq!(raw.blocks[0].children, Some(Vec::new()));
    }

    #[test]
    fn test_nested_raw_with_gate_builds_tree() {
        let raw = convert_to_raw(&tree_content_state()).unwrap();

        gate::set_feature_gate(|flag| flag == gate::TREE_DATA_SUPPORT);
        let content = convert_from_raw(&raw);
        gate::reset_feature_gate();

        let content = content.unwrap();
        let container = content.block("container").unwrap();
        assert!(container.is_tree_block());
        assert_eq!(
            container.child_keys(),
            ["bravo".to_string(), "charlie".to_string()]
        );
        assert_eq!(content.block("charlie").unwrap().prev_sibling_key(), Some("bravo"));
        assert_eq!(content.block("delta").unwrap().prev_sibling_key(), Some("container"));
    }

    #[test]
    fn test_nested_raw_without_gate_flattens() {
        gate::reset_feature_gate();
        let raw = convert_to_raw(&tree_content_state()).unwrap();
        let content = convert_from_raw(&raw).unwrap();
        let keys: Vec<&str> = content.block_map().keys().collect();
        assert_eq!(keys, vec!["alpha", "container", "bravo", "charlie", "delta"]);
        assert!(content.block_map().iter().all(|b| !b.is_tree_block()));
    }
}
