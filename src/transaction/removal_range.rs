//! Widening a removal so that entities are removed whole or by segment.

use super::RemovalDirection;
use crate::error::{invariant, Result};
use crate::exploration::entity::EntityRange;
use crate::exploration::segments::get_removal_range;
use crate::model::block::{slice_chars, ContentBlock};
use crate::model::entity::{EntityMutability, EntityStore};
use crate::model::selection::SelectionState;

/// Adjusts a forward `selection` spanning `start_block` to `end_block` so
/// that immutable entities at its edges are removed entirely and segmented
/// entities lose whole segments.
pub fn get_character_removal_range(
    store: &EntityStore,
    start_block: &ContentBlock,
    end_block: &ContentBlock,
    selection: &SelectionState,
    direction: RemovalDirection,
) -> Result<SelectionState> {
    let start_offset = selection.start_offset();
    let end_offset = selection.end_offset();
    let start_entity = start_block.entity_at(start_offset);
    let end_entity = end_offset
        .checked_sub(1)
        .and_then(|offset| end_block.entity_at(offset));

    if start_entity.is_none() && end_entity.is_none() {
        return Ok(selection.clone());
    }

    if let (Some(start_key), Some(end_key)) = (start_entity, end_entity) {
        if start_block.key() == end_block.key() && start_key == end_key {
            return get_entity_removal_range(
                store, end_block, selection, direction, end_key, true, true,
            );
        }
    }

    let start_adjusted = match start_entity {
        Some(key) if !is_mutable(store, key)? => Some(get_entity_removal_range(
            store,
            start_block,
            selection,
            direction,
            key,
            false,
            true,
        )?),
        _ => None,
    };
    let end_adjusted = match end_entity {
        Some(key) if !is_mutable(store, key)? => Some(get_entity_removal_range(
            store, end_block, selection, direction, key, false, false,
        )?),
        _ => None,
    };

    Ok(match (start_adjusted, end_adjusted) {
        (Some(start), Some(end)) => selection
            .clone()
            .with_anchor_offset(start.anchor_offset())
            .with_focus_offset(end.focus_offset()),
        (Some(start), None) => selection.clone().with_anchor_offset(start.start_offset()),
        (None, Some(end)) => selection.clone().with_focus_offset(end.end_offset()),
        (None, None) => selection.clone(),
    })
}

fn is_mutable(store: &EntityStore, key: &str) -> Result<bool> {
    Ok(store.get(key)?.mutability() == EntityMutability::Mutable)
}

/// The removal range for the entity `entity_key` at one edge of `selection`.
///
/// `entire_within` means the selection lies inside a single entity range;
/// `at_start` picks which edge of the selection is considered otherwise.
pub fn get_entity_removal_range(
    store: &EntityStore,
    block: &ContentBlock,
    selection: &SelectionState,
    direction: RemovalDirection,
    entity_key: &str,
    entire_within: bool,
    at_start: bool,
) -> Result<SelectionState> {
    let mut start = selection.start_offset();
    let mut end = selection.end_offset();
    let mutability = store.get(entity_key)?.mutability();
    let side = if at_start { start } else { end };

    if mutability == EntityMutability::Mutable {
        return Ok(selection.clone());
    }

    let mut ranges = Vec::new();
    block.find_entity_ranges(
        |c| c.entity() == Some(entity_key),
        |s, e| {
            if side >= s && side <= e {
                ranges.push(EntityRange { start: s, end: e });
            }
        },
    );
    invariant(
        ranges.len() == 1,
        "There should only be one entity range within this removal range.",
    )?;
    let range = ranges[0];

    if mutability == EntityMutability::Immutable {
        return Ok(selection
            .clone()
            .with_anchor_offset(range.start)
            .with_focus_offset(range.end)
            .with_is_backward(false));
    }

    // Segmented: widen only the edge that cuts into the entity.
    if !entire_within {
        if at_start {
            end = range.end;
        } else {
            start = range.start;
        }
    }
    let (removal_start, removal_end) = get_removal_range(
        start,
        end,
        &slice_chars(block.text(), range.start, range.end),
        range.start,
        direction,
    );
    Ok(selection
        .clone()
        .with_anchor_offset(removal_start)
        .with_focus_offset(removal_end)
        .with_is_backward(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::block::BlockType;
    use crate::transaction::apply_entity::apply_entity_to_content_block;

    fn tagged(store: &EntityStore, mutability: EntityMutability) -> (ContentBlock, String) {
        let key = store.create("TOKEN", mutability, None);
        let block = ContentBlock::new("k", BlockType::Unstyled, "say Mr. Ben Smith now");
        let block = apply_entity_to_content_block(&block, 4, 17, Some(key.as_str()));
        (block, key)
    }

    #[test]
    fn test_plain_text_range_is_unchanged() {
        let store = EntityStore::new();
        let (block, _) = tagged(&store, EntityMutability::Immutable);
        let selection = SelectionState::new("k", 0, "k", 2);
        let result = get_character_removal_range(
            &store,
            &block,
            &block,
            &selection,
            RemovalDirection::Forward,
        )
        .unwrap();
        assert_eq!(result, selection);
    }

    #[test]
    fn test_immutable_entity_removed_whole() {
        let store = EntityStore::new();
        let (block, _) = tagged(&store, EntityMutability::Immutable);
        let selection = SelectionState::new("k", 8, "k", 10);
        let result = get_character_removal_range(
            &store,
            &block,
            &block,
            &selection,
            RemovalDirection::Backward,
        )
        .unwrap();
        assert_eq!((result.start_offset(), result.end_offset()), (4, 17));
    }

    #[test]
    fn test_mutable_entity_is_not_widened() {
        let store = EntityStore::new();
        let (block, _) = tagged(&store, EntityMutability::Mutable);
        let selection = SelectionState::new("k", 8, "k", 10);
        let result = get_character_removal_range(
            &store,
            &block,
            &block,
            &selection,
            RemovalDirection::Backward,
        )
        .unwrap();
        assert_eq!(result, selection);
    }

    #[test]
    fn test_segmented_entity_loses_one_segment() {
        let store = EntityStore::new();
        let (block, _) = tagged(&store, EntityMutability::Segmented);
        // Backspace over the final "h" of "Smith".
        let selection = SelectionState::new("k", 16, "k", 17);
        let result = get_character_removal_range(
            &store,
            &block,
            &block,
            &selection,
            RemovalDirection::Backward,
        )
        .unwrap();
        // "Smith" goes, together with the space before it.
        assert_eq!((result.start_offset(), result.end_offset()), (11, 17));
    }

    #[test]
    fn test_immutable_at_start_edge_only() {
        let store = EntityStore::new();
        let (block, _) = tagged(&store, EntityMutability::Immutable);
        let selection = SelectionState::new("k", 6, "k", 19);
        let result = get_character_removal_range(
            &store,
            &block,
            &block,
            &selection,
            RemovalDirection::Forward,
        )
        .unwrap();
        assert_eq!((result.start_offset(), result.end_offset()), (4, 19));
    }
}
