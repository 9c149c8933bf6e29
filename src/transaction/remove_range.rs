//! Removing a selected range of text, joining its edge blocks.

use crate::error::{invariant, Result};
use crate::exploration::tree::{get_ancestor_keys, get_next_delimiter_block_key, relink_tree};
use crate::model::block::{slice_chars, CharacterList};
use crate::model::block_map::BlockMap;
use crate::model::content_state::ContentState;
use crate::model::selection::SelectionState;
use std::collections::HashSet;
use std::rc::Rc;

/// Removes the text covered by `selection`.
///
/// The start block keeps its text before the start offset followed by the
/// end block's text after the end offset. Blocks strictly between the two,
/// and the end block itself, are removed. In tree content, ancestors that
/// still lead to surviving blocks are retained and every link is rebuilt.
///
/// A collapsed selection returns `content` unchanged.
pub fn remove_range_from_content_state(
    content: &Rc<ContentState>,
    selection: &SelectionState,
) -> Result<Rc<ContentState>> {
    if selection.is_collapsed() {
        return Ok(content.clone());
    }
    content.validate_selection(selection)?;

    let block_map = content.block_map();
    let start_key = selection.start_key();
    let start_offset = selection.start_offset();
    let end_key = selection.end_key();
    let end_offset = selection.end_offset();

    let start_block = content.block(start_key)?;
    let end_block = content.block(end_key)?;
    let start_index = block_map.index_of(start_key).unwrap_or_default();
    let end_index = block_map.index_of(end_key).unwrap_or_default();
    invariant(
        start_index < end_index || (start_index == end_index && start_offset <= end_offset),
        "Selection start must not follow its end.",
    )?;

    let is_tree = start_block.is_tree_block();
    let mut retained: HashSet<String> = HashSet::new();
    if is_tree {
        let end_ancestors = get_ancestor_keys(end_key, block_map);
        if end_block.next_sibling_key().is_some() {
            retained.extend(end_ancestors.iter().cloned());
        }
        if !end_block.child_keys().is_empty() {
            retained.extend(end_ancestors);
        }
        if let Some(delimiter) = get_next_delimiter_block_key(end_block, block_map) {
            retained.extend(get_ancestor_keys(&delimiter, block_map));
        }
    }

    // An empty parent is dropped in favour of its first child when the range
    // runs from the parent's start to the child's start.
    let delete_parent = is_tree
        && start_key != end_key
        && start_offset == 0
        && end_offset == 0
        && end_block.parent_key() == Some(start_key)
        && end_block.prev_sibling_key().is_none();

    let mut joined = None;
    if !delete_parent {
        let text = format!(
            "{}{}",
            slice_chars(start_block.text(), 0, start_offset),
            slice_chars(end_block.text(), end_offset, end_block.length())
        );
        let mut chars: CharacterList = start_block.character_list()[..start_offset].to_vec();
        chars.extend_from_slice(&end_block.character_list()[end_offset..]);
        joined = Some(Rc::new((**start_block).clone().with_text(text, chars)));
    }

    let blocks: Vec<_> = block_map
        .iter()
        .enumerate()
        .filter_map(|(index, block)| {
            if delete_parent {
                return (block.key() != start_key).then(|| block.clone());
            }
            if index < start_index || index > end_index {
                Some(block.clone())
            } else if block.key() == start_key {
                joined.take()
            } else if block.key() == end_key {
                None
            } else if retained.contains(block.key()) {
                Some(block.clone())
            } else {
                None
            }
        })
        .collect();

    let new_map = if is_tree && start_key != end_key {
        relink_tree(blocks, block_map)
    } else {
        BlockMap::from_blocks(blocks)
    };

    let after = if delete_parent {
        selection.collapse_to(end_key, 0)
    } else {
        selection.collapse_to(start_key, start_offset)
    };

    Ok(Rc::new(
        content
            .with_block_map(new_map)
            .with_selection_before(selection.clone())
            .with_selection_after(after),
    ))
}
