use std::rc::Rc;

use draftquill::editor::{EditorChangeType, EditorState};
use draftquill::model::content_state::ContentState;
use draftquill::model::selection::SelectionState;
use draftquill::testing::sample_content_state;
use draftquill::transaction::remove_text::{
    backspace_character, backspace_word, delete_character, remove_text_with_strategy,
};
use draftquill::transaction::RemovalDirection;

fn editor_at(selection: SelectionState) -> EditorState {
    EditorState::create_with_content(Rc::new(sample_content_state())).accept_selection(selection)
}

fn assert_lengths_consistent(content: &ContentState) {
    for block in content.block_map().iter() {
        assert_eq!(block.character_list().len(), block.text().chars().count());
    }
}

#[test]
fn test_backspace_at_document_start_is_noop() {
    let state = editor_at(SelectionState::collapsed("a", 0));
    let after = backspace_character(&state).unwrap();
    assert!(ContentState::ptr_eq(after.current_content(), state.current_content()));
    assert_eq!(after.undo_stack_len(), 0);
}

#[test]
fn test_delete_at_document_end_is_noop() {
    let state = editor_at(SelectionState::collapsed("f", 7));
    let after = delete_character(&state).unwrap();
    assert!(ContentState::ptr_eq(after.current_content(), state.current_content()));
    assert_eq!(after.undo_stack_len(), 0);
}

#[test]
fn test_strategy_returning_same_selection_is_noop() {
    let state = editor_at(SelectionState::collapsed("c", 2));
    let after = remove_text_with_strategy(
        &state,
        |s| Ok(s.selection().clone()),
        RemovalDirection::Backward,
    )
    .unwrap();
    assert!(ContentState::ptr_eq(&after, state.current_content()));
}

#[test]
fn test_backspace_removes_previous_character() {
    let state = editor_at(SelectionState::collapsed("c", 2));
    let after = backspace_character(&state).unwrap();
    let content = after.current_content();
    assert_eq!(content.block("c").unwrap().text(), "Tst");
    assert_eq!(after.selection(), &SelectionState::collapsed("c", 1));
    assert_eq!(after.last_change_type(), Some(EditorChangeType::BackspaceCharacter));
    assert_lengths_consistent(content);
}

#[test]
fn test_backspace_inside_immutable_entity_removes_it_whole() {
    let state = editor_at(SelectionState::collapsed("b", 3));
    let after = backspace_character(&state).unwrap();
    let content = after.current_content();
    assert_eq!(content.block("b").unwrap().text(), "");
    assert_eq!(after.selection().start_offset(), 0);
    assert_lengths_consistent(content);
}

#[test]
fn test_forward_delete_joins_blocks() {
    let state = editor_at(SelectionState::collapsed("a", 5));
    let after = delete_character(&state).unwrap();
    let content = after.current_content();
    assert_eq!(content.block("a").unwrap().text(), "AlphaBravo");
    assert!(content.get_block_for_key("b").is_none());
    assert_eq!(after.selection(), &SelectionState::collapsed("a", 5));
    assert_lengths_consistent(content);
}

#[test]
fn test_backspace_word_removes_whole_word() {
    let state = editor_at(SelectionState::collapsed("f", 7));
    let after = backspace_word(&state).unwrap();
    assert_eq!(after.current_content().block("f").unwrap().text(), "");
    assert_eq!(after.last_change_type(), Some(EditorChangeType::RemoveRange));
}

#[test]
fn test_selected_range_is_removed_as_range() {
    let state = editor_at(SelectionState::new("c", 1, "f", 2));
    let after = backspace_character(&state).unwrap();
    let content = after.current_content();
    assert_eq!(content.block("c").unwrap().text(), "Tarlie");
    assert_eq!(content.block_map().len(), 3);
    assert_eq!(after.last_change_type(), Some(EditorChangeType::RemoveRange));
    assert_eq!(content.selection_before(), &SelectionState::new("c", 1, "f", 2));
}
