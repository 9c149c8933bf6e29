//! Clearing non-mutable entities cut by the edges of a selection.

use crate::error::{DraftError, Result};
use crate::model::block::ContentBlock;
use crate::model::content_state::ContentState;
use crate::model::entity::{EntityMutability, EntityStore};
use crate::model::selection::SelectionState;
use indexmap::IndexMap;
use std::rc::Rc;

use super::apply_entity::apply_entity_to_content_block;

/// Removes immutable and segmented entities that straddle either edge of
/// `selection`, so that no partial copy of them survives an edit.
///
/// The result's `selection_after` is `selection`. When no block changes and
/// the snapshot already records `selection` as its `selection_after`,
/// `content` itself is returned.
pub fn remove_entities_at_edges(
    content: &Rc<ContentState>,
    selection: &SelectionState,
) -> Result<Rc<ContentState>> {
    content.validate_selection(selection)?;
    let store = content.entity_store();

    let mut updates: IndexMap<String, Rc<ContentBlock>> = IndexMap::new();
    let start_key = selection.start_key();
    let start_block = content.block(start_key)?;
    if let Some(updated) = remove_for_block(store, start_block, selection.start_offset())? {
        updates.insert(start_key.to_string(), Rc::new(updated));
    }

    let end_key = selection.end_key();
    let end_block = updates
        .get(end_key)
        .cloned()
        .map_or_else(|| content.block(end_key).cloned(), Ok)?;
    if let Some(updated) = remove_for_block(store, &end_block, selection.end_offset())? {
        updates.insert(end_key.to_string(), Rc::new(updated));
    }

    if updates.is_empty() {
        if content.selection_after() == selection {
            return Ok(content.clone());
        }
        return Ok(Rc::new(content.with_selection_after(selection.clone())));
    }

    Ok(Rc::new(
        content
            .with_block_map(content.block_map().with_blocks(updates.into_values()))
            .with_selection_after(selection.clone()),
    ))
}

/// Clears the entity under `offset` when the characters on both sides of it
/// share a non-mutable entity. Returns `None` when `block` is unaffected.
fn remove_for_block(
    store: &EntityStore,
    block: &ContentBlock,
    offset: usize,
) -> Result<Option<ContentBlock>> {
    let before = offset.checked_sub(1).and_then(|i| block.entity_at(i));
    let after = block.entity_at(offset);
    let entity_key = match (before, after) {
        (Some(before), Some(after)) if before == after => after,
        _ => return Ok(None),
    };
    if store.get(entity_key)?.mutability() == EntityMutability::Mutable {
        return Ok(None);
    }

    let mut range = None;
    block.find_entity_ranges(
        |c| c.entity() == Some(entity_key),
        |start, end| {
            if start <= offset && offset <= end {
                range = Some((start, end));
            }
        },
    );
    let Some((start, end)) = range else {
        return Err(DraftError::invariant(
            "Removal range must exist within character list.",
        ));
    };
    Ok(Some(apply_entity_to_content_block(block, start, end, None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_content_state;

    #[test]
    fn test_cuts_immutable_entity_at_edge() {
        let content = Rc::new(sample_content_state());
        // The image entity covers all of "Bravo".
        let selection = SelectionState::new("b", 2, "c", 1);
        let result = remove_entities_at_edges(&content, &selection).unwrap();
        let b = result.block("b").unwrap();
        assert!((0..b.length()).all(|i| b.entity_at(i).is_none()));
        assert_eq!(b.text(), "Bravo");
        assert_eq!(result.selection_after(), &selection);
    }

    #[test]
    fn test_edge_at_entity_boundary_keeps_entity() {
        let content = Rc::new(sample_content_state());
        let selection = SelectionState::new("b", 5, "c", 1);
        let result = remove_entities_at_edges(&content, &selection).unwrap();
        assert!(Rc::ptr_eq(result.block("b").unwrap(), content.block("b").unwrap()));
    }

    #[test]
    fn test_mutable_entity_is_kept() {
        let content = Rc::new(sample_content_state());
        let key = content.create_entity("LINK", EntityMutability::Mutable, None);
        let block = content.block("a").unwrap();
        let a = apply_entity_to_content_block(block, 0, 5, Some(key.as_str()));
        let linked = Rc::new(content.with_block_map(content.block_map().with_block(Rc::new(a))));
        let selection = SelectionState::new("a", 2, "a", 3);
        let result = remove_entities_at_edges(&linked, &selection).unwrap();
        assert_eq!(result.block("a").unwrap().entity_at(2), Some(key.as_str()));
    }

    #[test]
    fn test_nothing_to_remove_is_identity() {
        let content = Rc::new(sample_content_state());
        let selection = content.selection_after().clone();
        let result = remove_entities_at_edges(&content, &selection).unwrap();
        assert!(ContentState::ptr_eq(&content, &result));
    }
}
