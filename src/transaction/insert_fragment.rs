//! Inserting a fragment of blocks at a collapsed cursor.

use super::fragment::randomize_block_map_keys;
use crate::error::{invariant, Result};
use crate::exploration::tree::relink_tree;
use crate::model::block::{slice_chars, BlockLinks, BlockType, ContentBlock};
use crate::model::block_map::BlockMap;
use crate::model::content_state::ContentState;
use crate::model::selection::SelectionState;
use std::rc::Rc;

/// How block data is combined when a single-block fragment lands in a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockDataMerge {
    /// The fragment's data replaces the target's.
    #[default]
    ReplaceWithNewData,
    /// The target's data is merged over the fragment's.
    MergeOldDataToNewData,
    /// The target keeps its data.
    KeepOldData,
}

/// Inserts `fragment` at the collapsed `selection`.
///
/// A single-block fragment is spliced into the target block. A longer one
/// splits the target: its head joins the text before the cursor, its tail
/// takes the text after it, and the blocks in between are inserted whole.
/// Fragment keys are always re-randomized first. The cursor ends up at the
/// end of the inserted text.
pub fn insert_fragment_into_content_state(
    content: &Rc<ContentState>,
    selection: &SelectionState,
    fragment: &BlockMap,
    merge: BlockDataMerge,
) -> Result<Rc<ContentState>> {
    invariant(
        selection.is_collapsed(),
        "`insertFragment` should only be called with a collapsed selection state.",
    )?;
    content.validate_selection(selection)?;
    if fragment.is_empty() {
        return Ok(content.clone());
    }

    let fragment = randomize_block_map_keys(fragment);
    let target = content.block(selection.start_key())?;
    if target.is_tree_block() {
        invariant(
            target.child_keys().is_empty(),
            "`insertFragment` should not be called when a container node is selected.",
        )?;
    }

    let offset = selection.start_offset();
    if fragment.len() == 1 {
        if let Some(head) = fragment.first() {
            return update_existing_block(content, selection, target, head, offset, merge);
        }
    }
    insert_blocks(content, selection, target, &fragment, offset)
}

fn update_existing_block(
    content: &Rc<ContentState>,
    selection: &SelectionState,
    target: &ContentBlock,
    fragment_block: &ContentBlock,
    offset: usize,
    merge: BlockDataMerge,
) -> Result<Rc<ContentState>> {
    let text = target.text();
    let chars = target.character_list();
    let new_text = format!(
        "{}{}{}",
        slice_chars(text, 0, offset),
        fragment_block.text(),
        slice_chars(text, offset, target.length())
    );
    let mut new_chars = chars[..offset].to_vec();
    new_chars.extend_from_slice(fragment_block.character_list());
    new_chars.extend_from_slice(&chars[offset..]);

    let data = match merge {
        BlockDataMerge::ReplaceWithNewData => fragment_block.data().clone(),
        BlockDataMerge::MergeOldDataToNewData => {
            let mut data = fragment_block.data().clone();
            data.extend(target.data().iter().map(|(k, v)| (k.clone(), v.clone())));
            data
        }
        BlockDataMerge::KeepOldData => target.data().clone(),
    };

    let block_type = if text.is_empty() && *target.block_type() == BlockType::Unstyled {
        fragment_block.block_type().clone()
    } else {
        target.block_type().clone()
    };

    let updated = target
        .clone()
        .with_text(new_text, new_chars)
        .with_data(data)
        .with_type(block_type);
    let new_offset = offset + fragment_block.length();

    Ok(Rc::new(
        content
            .with_block_map(content.block_map().with_block(Rc::new(updated)))
            .with_selection_before(selection.clone())
            .with_selection_after(selection.collapse_to(target.key(), new_offset)),
    ))
}

fn insert_blocks(
    content: &Rc<ContentState>,
    selection: &SelectionState,
    target: &ContentBlock,
    fragment: &BlockMap,
    offset: usize,
) -> Result<Rc<ContentState>> {
    let block_map = content.block_map();
    let is_tree = block_map.first().is_some_and(|b| b.is_tree_block());

    // Fragment blocks take the shape of the document they land in; fragment
    // roots become siblings of the target.
    let fragment_blocks: Vec<Rc<ContentBlock>> = fragment
        .iter()
        .map(|block| match (is_tree, block.is_tree_block()) {
            (true, false) => Rc::new((**block).clone().with_links(Some(BlockLinks {
                parent: target.parent_key().map(str::to_string),
                ..BlockLinks::default()
            }))),
            (true, true) if block.parent_key().is_none() => Rc::new(
                (**block)
                    .clone()
                    .with_parent(target.parent_key().map(str::to_string)),
            ),
            (false, true) => Rc::new((**block).clone().with_links(None)),
            _ => block.clone(),
        })
        .collect();

    let (Some(head), Some(tail)) = (fragment_blocks.first(), fragment_blocks.last()) else {
        return Ok(content.clone());
    };
    let final_key = tail.key().to_string();
    let final_offset = tail.length();
    let keep_head = is_tree && !head.child_keys().is_empty();

    let text = target.text();
    let chars = target.character_list();
    let head_text = slice_chars(text, 0, offset);

    let mut blocks = Vec::with_capacity(block_map.len() + fragment_blocks.len());
    for block in block_map.iter() {
        if block.key() != target.key() {
            blocks.push(block.clone());
            continue;
        }

        let middle = if keep_head {
            blocks.push(Rc::new(
                target
                    .clone()
                    .with_text(head_text.clone(), chars[..offset].to_vec()),
            ));
            &fragment_blocks[..fragment_blocks.len() - 1]
        } else {
            let mut head_chars = chars[..offset].to_vec();
            head_chars.extend_from_slice(head.character_list());
            let block_type = if head_text.is_empty() {
                head.block_type().clone()
            } else {
                target.block_type().clone()
            };
            blocks.push(Rc::new(
                target
                    .clone()
                    .with_text(format!("{}{}", head_text, head.text()), head_chars)
                    .with_type(block_type)
                    .with_data(head.data().clone()),
            ));
            &fragment_blocks[1..fragment_blocks.len() - 1]
        };
        blocks.extend(middle.iter().cloned());

        let mut tail_chars = tail.character_list().clone();
        tail_chars.extend_from_slice(&chars[offset..]);
        blocks.push(Rc::new((**tail).clone().with_text(
            format!(
                "{}{}",
                tail.text(),
                slice_chars(text, offset, target.length())
            ),
            tail_chars,
        )));
    }

    let new_map = if is_tree {
        let lineage = block_map.with_blocks(fragment_blocks.iter().cloned());
        relink_tree(blocks, &lineage)
    } else {
        BlockMap::from_blocks(blocks)
    };

    Ok(Rc::new(
        content
            .with_block_map(new_map)
            .with_selection_before(selection.clone())
            .with_selection_after(selection.collapse_to(final_key, final_offset)),
    ))
}
