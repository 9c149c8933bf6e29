//! Splitting a block at a collapsed cursor.

use super::modify_block::modify_block_for_content_state;
use crate::error::{invariant, Result};
use crate::exploration::tree::relink_tree;
use crate::keys::generate_random_key;
use crate::model::block::{slice_chars, BlockType};
use crate::model::block_map::BlockMap;
use crate::model::content_state::ContentState;
use crate::model::selection::SelectionState;
use crate::model::DataMap;
use std::rc::Rc;

/// Splits the block under the cursor in two. The lower half gets a fresh key
/// and empty data, and the cursor moves to its start.
///
/// An empty list item is not split; it turns into an `unstyled` block at
/// depth 0 instead.
pub fn split_block_in_content_state(
    content: &Rc<ContentState>,
    selection: &SelectionState,
) -> Result<Rc<ContentState>> {
    invariant(selection.is_collapsed(), "Selection range must be collapsed.")?;
    content.validate_selection(selection)?;

    let key = selection.anchor_key();
    let block = content.block(key)?;

    if block.text().is_empty() && block.block_type().is_list_item() {
        return modify_block_for_content_state(content, selection, |block| {
            block.clone().with_type(BlockType::Unstyled).with_depth(0)
        });
    }

    let is_tree = block.is_tree_block();
    if is_tree {
        invariant(
            block.child_keys().is_empty(),
            "ContentBlockNode must not have children",
        )?;
    }

    let offset = selection.anchor_offset();
    let text = block.text();
    let chars = block.character_list();
    let key_below = generate_random_key();

    let above = (**block)
        .clone()
        .with_text(slice_chars(text, 0, offset), chars[..offset].to_vec());
    let below = above
        .clone()
        .with_key(key_below.as_str())
        .with_text(slice_chars(text, offset, block.length()), chars[offset..].to_vec())
        .with_data(DataMap::new());
    let mut halves = Some((Rc::new(above), Rc::new(below)));

    let block_map = content.block_map();
    let mut blocks = Vec::with_capacity(block_map.len() + 1);
    for current in block_map.iter() {
        match halves.take() {
            Some((above, below)) if current.key() == key => {
                blocks.push(above);
                blocks.push(below);
            }
            pending => {
                halves = pending;
                blocks.push(current.clone());
            }
        }
    }

    let new_map = if is_tree {
        relink_tree(blocks, block_map)
    } else {
        BlockMap::from_blocks(blocks)
    };

    Ok(Rc::new(
        content
            .with_block_map(new_map)
            .with_selection_before(selection.clone())
            .with_selection_after(selection.collapse_to(key_below, 0)),
    ))
}
