//! Copying the selected part of a document as a fragment.

use super::remove_entities::remove_entities_at_edges;
use crate::editor::state::EditorState;
use crate::error::{invariant, DraftError, Result};
use crate::exploration::tree::relink_tree;
use crate::keys::generate_random_key;
use crate::model::block::{slice_chars, BlockLinks, ContentBlock};
use crate::model::block_map::BlockMap;
use crate::model::content_state::ContentState;
use crate::model::selection::SelectionState;
use std::collections::HashMap;
use std::rc::Rc;

/// The blocks covered by `selection`, trimmed to the selected text and
/// re-keyed. Non-mutable entities cut by the selection edges are dropped from
/// the copy.
pub fn get_content_state_fragment(
    content: &Rc<ContentState>,
    selection: &SelectionState,
) -> Result<BlockMap> {
    content.validate_selection(selection)?;
    let start_key = selection.start_key();
    let start_offset = selection.start_offset();
    let end_key = selection.end_key();
    let end_offset = selection.end_offset();
    invariant(
        start_key != end_key || start_offset <= end_offset,
        "Selection start must not follow its end.",
    )?;

    let without_entities = remove_entities_at_edges(content, selection)?;

    let blocks = without_entities
        .block_map()
        .range(start_key, end_key)
        .ok_or_else(|| DraftError::invariant("Selection start must not follow its end."))?;

    let sliced = blocks.into_iter().map(|block| {
        let key = block.key();
        let (start, end) = match (key == start_key, key == end_key) {
            (true, true) => (start_offset, end_offset),
            (true, false) => (start_offset, block.length()),
            (false, true) => (0, end_offset),
            (false, false) => return block,
        };
        Rc::new((*block).clone().with_text(
            slice_chars(block.text(), start, end),
            block.character_list()[start..end].to_vec(),
        ))
    });

    Ok(randomize_block_map_keys(&BlockMap::from_blocks(
        sliced.collect::<Vec<_>>(),
    )))
}

/// The fragment under the editor's selection, or `None` when it is collapsed.
pub fn get_fragment_from_selection(editor_state: &EditorState) -> Result<Option<BlockMap>> {
    let selection = editor_state.selection();
    if selection.is_collapsed() {
        return Ok(None);
    }
    get_content_state_fragment(editor_state.current_content(), selection).map(Some)
}

/// Gives every block of `block_map` a fresh key.
///
/// Tree links are remapped to the new keys; links to blocks outside the map
/// are dropped and rebuilt from the fragment's own structure.
pub fn randomize_block_map_keys(block_map: &BlockMap) -> BlockMap {
    let new_keys: HashMap<&str, String> = block_map
        .keys()
        .map(|key| (key, generate_random_key()))
        .collect();

    let mut is_tree = false;
    let blocks: Vec<Rc<ContentBlock>> = block_map
        .iter()
        .map(|block| {
            let key = new_keys
                .get(block.key())
                .cloned()
                .unwrap_or_else(generate_random_key);
            let mut renamed = (**block).clone().with_key(key);
            if block.is_tree_block() {
                is_tree = true;
                let parent = block
                    .parent_key()
                    .and_then(|parent| new_keys.get(parent))
                    .cloned();
                renamed = renamed.with_links(Some(BlockLinks {
                    parent,
                    ..BlockLinks::default()
                }));
            }
            Rc::new(renamed)
        })
        .collect();

    if is_tree {
        let lineage = BlockMap::from_blocks(blocks.clone());
        relink_tree(blocks, &lineage)
    } else {
        BlockMap::from_blocks(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_content_state, tree_content_state};

    #[test]
    fn test_fragment_trims_edges() {
        let content = Rc::new(sample_content_state());
        let fragment =
            get_content_state_fragment(&content, &SelectionState::new("a", 2, "c", 2)).unwrap();
        let texts: Vec<&str> = fragment.iter().map(|b| b.text()).collect();
        assert_eq!(texts, vec!["pha", "Bravo", "Te"]);
        assert!(fragment.get("a").is_none());
        assert!(fragment.iter().all(|b| content.get_block_for_key(b.key()).is_none()));
        // Block b lies wholly inside the selection, so its image entity survives.
        assert!(fragment.get_index(1).unwrap().entity_at(0).is_some());
    }

    #[test]
    fn test_reversed_offsets_in_one_block_are_rejected() {
        let content = Rc::new(sample_content_state());
        let selection = SelectionState::new("a", 3, "a", 1);
        let result = get_content_state_fragment(&content, &selection);
        assert!(matches!(result, Err(DraftError::Invariant(_))));

        let state = EditorState::create_with_content(content).accept_selection(selection);
        assert!(matches!(
            get_fragment_from_selection(&state),
            Err(DraftError::Invariant(_))
        ));
    }

    #[test]
    fn test_offset_past_block_end_is_rejected() {
        let content = Rc::new(sample_content_state());
        let selection = SelectionState::new("a", 1, "a", 9);
        assert!(matches!(
            get_content_state_fragment(&content, &selection),
            Err(DraftError::InvalidSelection { .. })
        ));
    }

    #[test]
    fn test_fragment_drops_cut_immutable_entity() {
        let content = Rc::new(sample_content_state());
        let fragment =
            get_content_state_fragment(&content, &SelectionState::new("b", 1, "b", 3)).unwrap();
        let block = fragment.first().unwrap();
        assert_eq!(block.text(), "ra");
        assert_eq!(block.entity_at(0), None);
    }

    #[test]
    fn test_randomize_keeps_tree_shape() {
        let content = tree_content_state();
        let randomized = randomize_block_map_keys(content.block_map());
        assert_eq!(randomized.len(), content.block_map().len());
        let container = randomized.get_index(1).unwrap();
        assert_eq!(container.child_keys().len(), 2);
        let first_child = randomized.get(&container.child_keys()[0]).unwrap();
        assert_eq!(first_child.text(), "Bravo");
        assert_eq!(first_child.parent_key(), Some(container.key()));
    }
}
