//! Transactions: pure functions from a snapshot plus an edit to a new snapshot.
//!
//! Every function here takes a `ContentState` handle and returns a new one
//! whose `selection_before` is the selection the edit was made with and whose
//! `selection_after` is where the cursor lands. When an edit changes nothing,
//! the input handle itself is returned, so `Rc::ptr_eq` tells the caller that
//! no history entry is needed.
//!
//! The high-level entry points live in [`modifier`]; the other modules are the
//! building blocks it composes.

pub mod apply_entity;
pub mod atomic;
pub mod fragment;
pub mod inline_style;
pub mod insert_fragment;
pub mod insert_text;
pub mod modifier;
pub mod modify_block;
pub mod move_block;
pub mod removal_range;
pub mod remove_entities;
pub mod remove_range;
pub mod remove_text;
pub mod split_block;

pub use insert_fragment::BlockDataMerge;
pub use move_block::InsertionMode;

use crate::error::{DraftError, Result};
use crate::model::block::{CharacterList, ContentBlock};
use crate::model::character::CharacterMetadata;
use crate::model::content_state::ContentState;
use crate::model::selection::SelectionState;
use std::rc::Rc;

/// Which way a deletion extends from a collapsed cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalDirection {
    Backward,
    Forward,
}

/// Blocks from the selection's start block through its end block.
pub(crate) fn selected_blocks(
    content: &ContentState,
    selection: &SelectionState,
) -> Result<Vec<Rc<ContentBlock>>> {
    content.block(selection.start_key())?;
    content.block(selection.end_key())?;
    content
        .block_map()
        .range(selection.start_key(), selection.end_key())
        .ok_or_else(|| DraftError::invariant("Selection start must not follow its end."))
}

/// Rewrites the metadata of every selected character with `map_char`.
///
/// Blocks whose characters all map to the same pooled instance are kept as
/// they are; if nothing changes and both selections already equal
/// `selection`, the input handle is returned.
pub(crate) fn map_selected_characters<F>(
    content: &Rc<ContentState>,
    selection: &SelectionState,
    map_char: F,
) -> Result<Rc<ContentState>>
where
    F: Fn(&Rc<CharacterMetadata>) -> Rc<CharacterMetadata>,
{
    content.validate_selection(selection)?;
    let start_key = selection.start_key();
    let end_key = selection.end_key();

    let mut updated = Vec::new();
    for block in selected_blocks(content, selection)? {
        let slice_start = if block.key() == start_key {
            selection.start_offset()
        } else {
            0
        };
        let slice_end = if block.key() == end_key {
            selection.end_offset()
        } else {
            block.length()
        };

        let mut changed = false;
        let chars: CharacterList = block
            .character_list()
            .iter()
            .enumerate()
            .map(|(index, current)| {
                if index < slice_start || index >= slice_end {
                    return current.clone();
                }
                let next = map_char(current);
                changed |= !Rc::ptr_eq(&next, current);
                next
            })
            .collect();
        if changed {
            updated.push(Rc::new((*block).clone().with_characters(chars)));
        }
    }

    if updated.is_empty()
        && content.selection_before() == selection
        && content.selection_after() == selection
    {
        return Ok(content.clone());
    }

    let block_map = if updated.is_empty() {
        content.block_map().clone()
    } else {
        content.block_map().with_blocks(updated)
    };
    Ok(Rc::new(
        content
            .with_block_map(block_map)
            .with_selection_before(selection.clone())
            .with_selection_after(selection.clone()),
    ))
}

/// Sets `selection_before` on an edited snapshot; no-ops pass through.
pub(crate) fn stamp_selection_before(
    original: &Rc<ContentState>,
    edited: Rc<ContentState>,
    selection: &SelectionState,
) -> Rc<ContentState> {
    if ContentState::ptr_eq(original, &edited) || edited.selection_before() == selection {
        return edited;
    }
    Rc::new(edited.with_selection_before(selection.clone()))
}
