//! Moving a block (and, in tree content, its subtree) next to another block.

use crate::error::{invariant, DraftError, Result};
use crate::exploration::tree::{get_descendant_keys, is_descendant_of, relink_tree};
use crate::model::block::ContentBlock;
use crate::model::block_map::BlockMap;
use crate::model::content_state::ContentState;
use std::collections::HashSet;
use std::rc::Rc;

/// Where a moved block lands relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionMode {
    Before,
    After,
    Replace,
}

const NEXT_TO_ITSELF: &str = "Block cannot be moved next to itself.";

/// Moves `block_to_move` before or after `target_block`.
///
/// The moved block becomes a sibling of the target. The new snapshot's
/// `selection_before` is the input's `selection_after`, and its
/// `selection_after` is collapsed at the start of the moved block.
pub fn move_block_in_content_state(
    content: &Rc<ContentState>,
    block_to_move: &ContentBlock,
    target_block: &ContentBlock,
    mode: InsertionMode,
) -> Result<Rc<ContentState>> {
    invariant(mode != InsertionMode::Replace, "Replacing blocks is not supported.")?;

    let key = block_to_move.key();
    let target_key = target_block.key();
    invariant(key != target_key, NEXT_TO_ITSELF)?;

    let block_map = content.block_map();
    let moving = content.block(key)?;
    let target = content.block(target_key)?;

    let neighbour = match mode {
        InsertionMode::Before => block_map.key_before(target_key),
        _ => block_map.key_after(target_key),
    };
    invariant(neighbour != Some(key), NEXT_TO_ITSELF)?;

    let is_tree = moving.is_tree_block();
    let mut moving_keys = vec![key.to_string()];
    if is_tree {
        invariant(
            !is_descendant_of(target_key, key, block_map),
            "Block cannot be moved into one of its own descendants.",
        )?;
        let sibling = match mode {
            InsertionMode::Before => target.prev_sibling_key(),
            _ => target.next_sibling_key(),
        };
        invariant(sibling != Some(key), NEXT_TO_ITSELF)?;
        moving_keys.extend(get_descendant_keys(key, block_map));
    }

    let moving_set: HashSet<&str> = moving_keys.iter().map(String::as_str).collect();
    let mut remaining: Vec<Rc<ContentBlock>> = block_map
        .iter()
        .filter(|block| !moving_set.contains(block.key()))
        .cloned()
        .collect();

    let target_index = remaining
        .iter()
        .position(|block| block.key() == target_key)
        .ok_or_else(|| DraftError::BlockNotFound(target_key.to_string()))?;
    let insert_at = match mode {
        InsertionMode::Before => target_index,
        _ if is_tree => {
            let subtree: HashSet<String> =
                get_descendant_keys(target_key, block_map).into_iter().collect();
            target_index
                + 1
                + remaining[target_index + 1..]
                    .iter()
                    .take_while(|block| subtree.contains(block.key()))
                    .count()
        }
        _ => target_index + 1,
    };

    let mut moved: Vec<Rc<ContentBlock>> = moving_keys
        .iter()
        .filter_map(|k| block_map.get(k).cloned())
        .collect();
    if is_tree {
        if let Some(first) = moved.first_mut() {
            *first = Rc::new(
                (**first)
                    .clone()
                    .with_parent(target.parent_key().map(str::to_string)),
            );
        }
    }

    let tail = remaining.split_off(insert_at);
    remaining.extend(moved);
    remaining.extend(tail);

    let new_map = if is_tree {
        relink_tree(remaining, block_map)
    } else {
        BlockMap::from_blocks(remaining)
    };

    let before = content.selection_after().clone();
    let after = before.collapse_to(key, 0);
    Ok(Rc::new(
        content
            .with_block_map(new_map)
            .with_selection_before(before)
            .with_selection_after(after),
    ))
}
