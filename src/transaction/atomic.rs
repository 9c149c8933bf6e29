//! Atomic blocks: single-entity blocks such as images or embeds.

use super::modifier;
use super::move_block::{move_block_in_content_state, InsertionMode};
use super::RemovalDirection;
use crate::editor::change::EditorChangeType;
use crate::editor::state::EditorState;
use crate::error::Result;
use crate::exploration::tree::relink_tree;
use crate::gate;
use crate::keys::generate_random_key;
use crate::model::block::{char_len, BlockType, ContentBlock};
use crate::model::block_map::{BlockMap, BlockMapBuilder};
use crate::model::character::{CharacterMetadata, InlineStyle};
use crate::model::content_state::ContentState;
use crate::model::selection::SelectionState;
use std::rc::Rc;
use tracing::debug;

/// Inserts an atomic block whose text is `character`, every position tagged
/// with `entity_key`, followed by an empty `unstyled` block.
///
/// Any selected text is removed first and the block under the cursor is split
/// there; the atomic block takes the place of the lower half, whose remaining
/// text moves into the trailing block. The whole change is one
/// `insert-fragment` history entry.
pub fn insert_atomic_block(
    editor_state: &EditorState,
    entity_key: &str,
    character: &str,
) -> Result<EditorState> {
    let content = editor_state.current_content();
    let selection = editor_state.selection();

    let after_removal = modifier::remove_range(content, selection, RemovalDirection::Backward)?;
    let target = if selection.is_collapsed() {
        selection.clone()
    } else {
        after_removal.selection_after().clone()
    };

    let after_split = modifier::split_block(&after_removal, &target)?;
    let insertion_target = after_split.selection_after().clone();
    let as_atomic = modifier::set_block_type(&after_split, &insertion_target, BlockType::Atomic)?;

    let char_data = CharacterMetadata::create(InlineStyle::new(), Some(entity_key.to_string()));
    let chars = vec![char_data; char_len(character)];
    let fragment = atomic_fragment(
        ContentBlock::new(generate_random_key(), BlockType::Atomic, "").with_text(character, chars),
        ContentBlock::new(generate_random_key(), BlockType::Unstyled, ""),
    );

    let with_atomic = modifier::replace_with_fragment(&as_atomic, &insertion_target, &fragment)?;
    let new_content = with_atomic
        .with_selection_before(selection.clone())
        .with_selection_after(with_atomic.selection_after().clone().with_has_focus(true));
    debug!(entity = entity_key, "inserted atomic block");

    Ok(editor_state.push(Rc::new(new_content), EditorChangeType::InsertFragment))
}

fn atomic_fragment(atomic: ContentBlock, divider: ContentBlock) -> BlockMap {
    if !gate::tree_data_support() {
        return BlockMapBuilder::create_from_array(vec![Rc::new(atomic), Rc::new(divider)]);
    }
    let blocks = vec![
        Rc::new(atomic.with_links(Some(Default::default()))),
        Rc::new(divider.with_links(Some(Default::default()))),
    ];
    let lineage = BlockMap::from_blocks(blocks.clone());
    relink_tree(blocks, &lineage)
}

/// Moves `atomic_block` to `target_range`.
///
/// With an explicit `mode` the block goes before the block at the start of
/// the range, or after the block at its end. Without one the range is removed
/// and the resulting cursor decides: at a block's start the atomic block goes
/// before that block, at its end after it, and anywhere else the block is
/// split and the atomic block goes before the lower half.
pub fn move_atomic_block(
    editor_state: &EditorState,
    atomic_block: &ContentBlock,
    target_range: &SelectionState,
    mode: Option<InsertionMode>,
) -> Result<EditorState> {
    let content = editor_state.current_content();
    let selection = editor_state.selection();

    let with_moved = match mode {
        Some(mode) => {
            let target_key = match mode {
                InsertionMode::Before => target_range.start_key(),
                _ => target_range.end_key(),
            };
            let target_block = content.block(target_key)?.clone();
            move_block_in_content_state(content, atomic_block, &target_block, mode)?
        }
        None => {
            let after_removal =
                modifier::remove_range(content, target_range, RemovalDirection::Backward)?;
            let removal_selection = if target_range.is_collapsed() {
                target_range.clone()
            } else {
                after_removal.selection_after().clone()
            };
            let target_block = after_removal.block(removal_selection.focus_key())?.clone();

            if removal_selection.start_offset() == 0 {
                move_block_in_content_state(
                    &after_removal,
                    atomic_block,
                    &target_block,
                    InsertionMode::Before,
                )?
            } else if removal_selection.end_offset() == target_block.length() {
                move_block_in_content_state(
                    &after_removal,
                    atomic_block,
                    &target_block,
                    InsertionMode::After,
                )?
            } else {
                let after_split = modifier::split_block(&after_removal, &removal_selection)?;
                let split_selection = after_split.selection_after();
                let target_block = after_split.block(split_selection.focus_key())?.clone();
                move_block_in_content_state(
                    &after_split,
                    atomic_block,
                    &target_block,
                    InsertionMode::Before,
                )?
            }
        }
    };

    let new_content = with_moved
        .with_selection_before(selection.clone())
        .with_selection_after(with_moved.selection_after().clone().with_has_focus(true));
    debug!(block = atomic_block.key(), "moved atomic block");

    Ok(editor_state.push(Rc::new(new_content), EditorChangeType::MoveBlock))
}

/// Whether `content` holds an atomic block tagged with `entity_key`.
pub fn has_atomic_block_for_entity(content: &ContentState, entity_key: &str) -> bool {
    content.block_map().iter().any(|block| {
        *block.block_type() == BlockType::Atomic && block.entity_at(0) == Some(entity_key)
    })
}
