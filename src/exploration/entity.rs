//! Entity ranges within blocks.

use crate::error::{invariant, Result};
use crate::model::block::ContentBlock;
use crate::model::content_state::ContentState;
use crate::model::entity::EntityMutability;
use crate::model::selection::SelectionState;

/// A `[start, end)` character range of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRange {
    pub start: usize,
    pub end: usize,
}

/// Every contiguous range of `block` tagged with `entity_key`.
pub fn get_ranges_for_entity(block: &ContentBlock, entity_key: &str) -> Result<Vec<EntityRange>> {
    let mut ranges = Vec::new();
    block.find_entity_ranges(
        |c| c.entity() == Some(entity_key),
        |start, end| ranges.push(EntityRange { start, end }),
    );
    invariant(!ranges.is_empty(), "Entity key not found in this range.")?;
    Ok(ranges)
}

/// The entity that text typed over `selection` should continue, if any.
///
/// Only mutable entities continue. A collapsed cursor continues an entity
/// only when the characters on both sides of it belong to that entity.
pub fn get_entity_key_for_selection(
    content: &ContentState,
    selection: &SelectionState,
) -> Result<Option<String>> {
    let entity_key = if selection.is_collapsed() {
        let offset = selection.anchor_offset();
        if offset == 0 {
            return Ok(None);
        }
        let block = content.block(selection.anchor_key())?;
        let before = block.entity_at(offset - 1);
        if before != block.entity_at(offset) {
            return Ok(None);
        }
        before.map(str::to_string)
    } else {
        let block = content.block(selection.start_key())?;
        let offset = selection.start_offset();
        if offset == block.length() {
            None
        } else {
            block.entity_at(offset).map(str::to_string)
        }
    };

    match entity_key {
        Some(key) if content.get_entity(&key)?.mutability() == EntityMutability::Mutable => {
            Ok(Some(key))
        }
        _ => Ok(None),
    }
}
