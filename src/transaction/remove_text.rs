//! Deleting text from a collapsed cursor: backspace and delete, by character
//! or by word.

use super::{modifier, RemovalDirection};
use crate::editor::change::EditorChangeType;
use crate::editor::state::EditorState;
use crate::error::Result;
use crate::exploration::word;
use crate::gate;
use crate::model::block::slice_chars;
use crate::model::content_state::ContentState;
use crate::model::selection::SelectionState;
use std::rc::Rc;
use tracing::trace;

/// Removes text at the editor's selection.
///
/// A non-collapsed selection is removed as it is. A collapsed cursor is first
/// widened by `strategy`; when the widened selection is still the cursor, or
/// the cursor sits at the start (backward) or end (forward) of the document,
/// nothing changes and the current content is returned. With tree data
/// support on, selections spanning blocks and forward deletes that would pull
/// in an empty or missing next sibling are refused the same way.
pub fn remove_text_with_strategy<S>(
    editor_state: &EditorState,
    strategy: S,
    direction: RemovalDirection,
) -> Result<Rc<ContentState>>
where
    S: Fn(&EditorState) -> Result<SelectionState>,
{
    let selection = editor_state.selection();
    let content = editor_state.current_content();
    let tree = gate::tree_data_support();

    if tree && selection.anchor_key() != selection.focus_key() {
        trace!("multi-block removal refused in tree mode");
        return Ok(content.clone());
    }

    let mut target = selection.clone();
    if selection.is_collapsed() {
        match direction {
            RemovalDirection::Forward => {
                if editor_state.is_selection_at_end_of_content() {
                    return Ok(content.clone());
                }
                if tree {
                    let anchor = content.block(selection.anchor_key())?;
                    if selection.anchor_offset() == anchor.length() {
                        let sibling = anchor
                            .next_sibling_key()
                            .and_then(|key| content.get_block_for_key(key));
                        if sibling.map_or(true, |s| s.length() == 0) {
                            return Ok(content.clone());
                        }
                    }
                }
            }
            RemovalDirection::Backward => {
                if editor_state.is_selection_at_start_of_content() {
                    return Ok(content.clone());
                }
            }
        }

        target = strategy(editor_state)?;
        if &target == selection {
            return Ok(content.clone());
        }
    }

    modifier::remove_range(content, &target, direction)
}

/// The selection extended backward from the cursor by up to `max_distance`
/// characters, crossing into the previous block at offset 0.
pub fn move_selection_backward(
    editor_state: &EditorState,
    max_distance: usize,
) -> Result<SelectionState> {
    let selection = editor_state.selection();
    let content = editor_state.current_content();
    let key = selection.start_key();
    let offset = selection.start_offset();

    let (focus_key, focus_offset) = if max_distance > offset {
        match content.get_key_before(key) {
            Some(before) => (before.to_string(), content.block(before)?.length()),
            None => (key.to_string(), 0),
        }
    } else {
        (key.to_string(), offset - max_distance)
    };

    Ok(selection
        .clone()
        .with_focus_key(focus_key)
        .with_focus_offset(focus_offset)
        .with_is_backward(true))
}

/// The selection extended forward from the cursor by up to `max_distance`
/// characters, crossing into the next block at the block's end.
pub fn move_selection_forward(
    editor_state: &EditorState,
    max_distance: usize,
) -> Result<SelectionState> {
    let selection = editor_state.selection();
    let content = editor_state.current_content();
    let key = selection.start_key();
    let offset = selection.start_offset();
    let length = content.block(key)?.length();

    let (focus_key, focus_offset) = if max_distance > length - offset.min(length) {
        match content.get_key_after(key) {
            Some(after) => (after.to_string(), 0),
            None => (key.to_string(), length),
        }
    } else {
        (key.to_string(), offset + max_distance)
    };

    Ok(selection
        .clone()
        .with_focus_key(focus_key)
        .with_focus_offset(focus_offset))
}

fn push_removal(
    editor_state: &EditorState,
    after_removal: Rc<ContentState>,
    collapsed_change: EditorChangeType,
) -> EditorState {
    if ContentState::ptr_eq(editor_state.current_content(), &after_removal) {
        return editor_state.clone();
    }
    let selection = editor_state.selection();
    let change = if selection.is_collapsed() {
        collapsed_change
    } else {
        EditorChangeType::RemoveRange
    };
    editor_state.push(
        Rc::new(after_removal.with_selection_before(selection.clone())),
        change,
    )
}

/// Backspace: removes the selection, or the character before the cursor.
pub fn backspace_character(editor_state: &EditorState) -> Result<EditorState> {
    let after = remove_text_with_strategy(
        editor_state,
        |state| move_selection_backward(state, 1),
        RemovalDirection::Backward,
    )?;
    Ok(push_removal(
        editor_state,
        after,
        EditorChangeType::BackspaceCharacter,
    ))
}

/// Delete: removes the selection, or the character after the cursor.
pub fn delete_character(editor_state: &EditorState) -> Result<EditorState> {
    let after = remove_text_with_strategy(
        editor_state,
        |state| move_selection_forward(state, 1),
        RemovalDirection::Forward,
    )?;
    Ok(push_removal(editor_state, after, EditorChangeType::DeleteCharacter))
}

/// Removes the selection, or the word before the cursor.
pub fn backspace_word(editor_state: &EditorState) -> Result<EditorState> {
    let after = remove_text_with_strategy(
        editor_state,
        |state| {
            let selection = state.selection();
            let offset = selection.start_offset();
            if offset == 0 {
                return move_selection_backward(state, 1);
            }
            let block = state.current_content().block(selection.start_key())?;
            let before = slice_chars(block.text(), 0, offset);
            move_selection_backward(state, word::backward_length(&before).max(1))
        },
        RemovalDirection::Backward,
    )?;
    Ok(push_removal(editor_state, after, EditorChangeType::RemoveRange))
}

/// Removes the selection, or the word after the cursor.
pub fn delete_word(editor_state: &EditorState) -> Result<EditorState> {
    let after = remove_text_with_strategy(
        editor_state,
        |state| {
            let selection = state.selection();
            let offset = selection.start_offset();
            let block = state.current_content().block(selection.start_key())?;
            let after = slice_chars(block.text(), offset, block.length());
            move_selection_forward(state, word::forward_length(&after).max(1))
        },
        RemovalDirection::Forward,
    )?;
    Ok(push_removal(editor_state, after, EditorChangeType::RemoveRange))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::block::BlockType;
    use crate::testing::sample_content_state;

    fn editor_at(selection: SelectionState) -> EditorState {
        EditorState::create_with_content(Rc::new(sample_content_state()))
            .accept_selection(selection)
    }

    fn text_of(state: &EditorState, key: &str) -> String {
        state
            .current_content()
            .block(key)
            .unwrap()
            .text()
            .to_string()
    }

    #[test]
    fn test_backspace_at_start_of_content_is_noop() {
        let state = editor_at(SelectionState::collapsed("a", 0));
        let after = backspace_character(&state).unwrap();
        assert!(Rc::ptr_eq(after.current_content(), state.current_content()));
        assert_eq!(after.undo_stack_len(), 0);
    }

    #[test]
    fn test_delete_at_end_of_content_is_noop() {
        let state = editor_at(SelectionState::collapsed("f", 7));
        let after = delete_character(&state).unwrap();
        assert!(Rc::ptr_eq(after.current_content(), state.current_content()));
    }

    #[test]
    fn test_backspace_character() {
        let state = editor_at(SelectionState::collapsed("c", 2));
        let after = backspace_character(&state).unwrap();
        assert_eq!(text_of(&after, "c"), "Tst");
        assert_eq!(after.selection(), &SelectionState::collapsed("c", 1));
        assert_eq!(
            after.last_change_type(),
            Some(EditorChangeType::BackspaceCharacter)
        );
        assert_eq!(
            after.current_content().selection_before(),
            &SelectionState::collapsed("c", 2)
        );
    }

    #[test]
    fn test_backspace_at_block_start_joins_blocks() {
        let state = editor_at(SelectionState::collapsed("c", 0));
        let after = backspace_character(&state).unwrap();
        let content = after.current_content();
        assert!(content.get_block_for_key("c").is_none());
        assert_eq!(text_of(&after, "b"), "BravoTest");
        assert_eq!(after.selection(), &SelectionState::collapsed("b", 5));
    }

    #[test]
    fn test_backspace_into_immutable_entity_removes_it() {
        let state = editor_at(SelectionState::collapsed("b", 5));
        let after = backspace_character(&state).unwrap();
        assert_eq!(text_of(&after, "b"), "");
        assert_eq!(
            after.current_content().block("b").unwrap().block_type(),
            &BlockType::UnorderedListItem
        );
    }

    #[test]
    fn test_delete_character_at_block_end_joins_next() {
        let state = editor_at(SelectionState::collapsed("a", 5));
        let after = delete_character(&state).unwrap();
        assert!(after.current_content().get_block_for_key("b").is_none());
        assert_eq!(text_of(&after, "a"), "AlphaBravo");
        assert_eq!(after.last_change_type(), Some(EditorChangeType::DeleteCharacter));
    }

    #[test]
    fn test_non_collapsed_removal_is_remove_range() {
        let state = editor_at(SelectionState::new("c", 1, "c", 3));
        let after = delete_character(&state).unwrap();
        assert_eq!(text_of(&after, "c"), "Tt");
        assert_eq!(after.last_change_type(), Some(EditorChangeType::RemoveRange));
    }

    #[test]
    fn test_word_removal() {
        let content = Rc::new(ContentState::create_from_text("hello big world"));
        let key = content.get_first_block().unwrap().key().to_string();
        let state = EditorState::create_with_content(content)
            .accept_selection(SelectionState::collapsed(key.as_str(), 9));

        let back = backspace_word(&state).unwrap();
        assert_eq!(text_of(&back, &key), "hello  world");

        let forward = delete_word(&state).unwrap();
        assert_eq!(text_of(&forward, &key), "hello big");
    }

    #[test]
    fn test_move_selection_backward_crosses_blocks() {
        let state = editor_at(SelectionState::collapsed("d", 0));
        let selection = move_selection_backward(&state, 1).unwrap();
        assert_eq!(selection.focus_key(), "c");
        assert_eq!(selection.focus_offset(), 4);
        assert!(selection.is_backward());
    }
}
