//! Block-level changes over a selection: type and data.

use super::selected_blocks;
use crate::error::Result;
use crate::model::block::{BlockType, ContentBlock};
use crate::model::content_state::ContentState;
use crate::model::selection::SelectionState;
use crate::model::DataMap;
use std::rc::Rc;

/// Applies `operation` to every block touched by `selection`.
///
/// Blocks for which `operation` yields an equal block are kept as the same
/// `Rc`. If no block changes and the snapshot already records `selection`,
/// `content` itself is returned.
pub fn modify_block_for_content_state<F>(
    content: &Rc<ContentState>,
    selection: &SelectionState,
    operation: F,
) -> Result<Rc<ContentState>>
where
    F: Fn(&ContentBlock) -> ContentBlock,
{
    let updated: Vec<Rc<ContentBlock>> = selected_blocks(content, selection)?
        .into_iter()
        .filter_map(|block| {
            let next = operation(&block);
            (next != *block).then(|| Rc::new(next))
        })
        .collect();

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

/// Sets the type of every selected block, resetting depth to 0.
pub fn set_block_type(
    content: &Rc<ContentState>,
    selection: &SelectionState,
    block_type: BlockType,
) -> Result<Rc<ContentState>> {
    modify_block_for_content_state(content, selection, |block| {
        block.clone().with_type(block_type.clone()).with_depth(0)
    })
}

/// Replaces the data of every selected block.
pub fn set_block_data(
    content: &Rc<ContentState>,
    selection: &SelectionState,
    data: &DataMap,
) -> Result<Rc<ContentState>> {
    modify_block_for_content_state(content, selection, |block| {
        block.clone().with_data(data.clone())
    })
}

/// Merges `data` into the data of every selected block.
pub fn merge_block_data(
    content: &Rc<ContentState>,
    selection: &SelectionState,
    data: &DataMap,
) -> Result<Rc<ContentState>> {
    modify_block_for_content_state(content, selection, |block| {
        let mut merged = block.data().clone();
        merged.extend(data.iter().map(|(k, v)| (k.clone(), v.clone())));
        block.clone().with_data(merged)
    })
}
