use std::rc::Rc;

use draftquill::config::Config;
use draftquill::editor::{EditorChangeType, EditorState};
use draftquill::model::content_state::ContentState;
use draftquill::model::selection::SelectionState;
use draftquill::testing::sample_content_state;
use draftquill::transaction::modifier;

fn editor() -> EditorState {
    EditorState::create_with_content(Rc::new(sample_content_state()))
        .accept_selection(SelectionState::collapsed("a", 5))
}

fn type_text(state: &EditorState, text: &str) -> EditorState {
    let content =
        modifier::insert_text(state.current_content(), state.selection(), text, None, None)
            .unwrap();
    state.push(content, EditorChangeType::InsertCharacters)
}

fn text_of(state: &EditorState, key: &str) -> String {
    state.current_content().block(key).unwrap().text().to_string()
}

#[test]
fn test_noop_push_leaves_stacks_alone() {
    let state = editor();
    let same = state.current_content().clone();
    let pushed = state.push(same, EditorChangeType::InsertCharacters);

    assert_eq!(pushed.undo_stack_len(), 0);
    assert_eq!(pushed.redo_stack_len(), 0);
    assert!(ContentState::ptr_eq(pushed.current_content(), state.current_content()));
    assert_eq!(pushed.last_change_type(), None);
}

#[test]
fn test_undo_restores_content_and_selection() {
    let state = editor();
    let typed = type_text(&state, "!");
    assert_eq!(text_of(&typed, "a"), "Alpha!");
    assert_eq!(typed.selection(), &SelectionState::collapsed("a", 6));

    let undone = typed.undo();
    assert!(ContentState::ptr_eq(undone.current_content(), state.current_content()));
    assert_eq!(undone.selection(), typed.current_content().selection_before());
    assert_eq!(undone.selection(), &SelectionState::collapsed("a", 5));
    assert_eq!(undone.redo_stack_len(), 1);
    assert!(undone.must_force_selection());
}

#[test]
fn test_redo_after_undo_round_trips() {
    let typed = type_text(&editor(), "!");
    let redone = typed.undo().redo();

    assert!(ContentState::ptr_eq(redone.current_content(), typed.current_content()));
    assert_eq!(redone.selection(), typed.current_content().selection_after());
    assert_eq!(redone.undo_stack_len(), 1);
    assert_eq!(redone.redo_stack_len(), 0);
}

#[test]
fn test_undo_with_empty_stack_is_noop() {
    let state = editor();
    let undone = state.undo();
    assert!(ContentState::ptr_eq(undone.current_content(), state.current_content()));
    assert_eq!(undone.selection(), state.selection());
}

#[test]
fn test_consecutive_typing_is_one_entry() {
    let state = type_text(&type_text(&type_text(&editor(), "a"), "b"), "c");
    assert_eq!(text_of(&state, "a"), "Alphaabc");
    assert_eq!(state.undo_stack_len(), 1);

    let undone = state.undo();
    assert_eq!(text_of(&undone, "a"), "Alpha");
    assert_eq!(undone.selection(), &SelectionState::collapsed("a", 5));
}

#[test]
fn test_moved_selection_starts_new_entry() {
    let first = type_text(&editor(), "a");
    let moved = first.accept_selection(SelectionState::collapsed("c", 0));
    let second = type_text(&moved, "b");
    assert_eq!(second.undo_stack_len(), 2);
    assert_eq!(text_of(&second.undo(), "c"), "Test");
    assert_eq!(text_of(&second.undo(), "a"), "Alphaa");
}

#[test]
fn test_new_edit_clears_redo() {
    let undone = type_text(&editor(), "a").undo();
    assert_eq!(undone.redo_stack_len(), 1);
    let retyped = type_text(&undone, "b");
    assert_eq!(retyped.redo_stack_len(), 0);
}

#[test]
fn test_undo_limit_drops_oldest() {
    let config = Config {
        undo_limit: 2,
        ..Config::default()
    };
    let mut state = EditorState::create_with_config(Rc::new(sample_content_state()), &config);
    for key in ["a", "c", "f"] {
        state = state.accept_selection(SelectionState::collapsed(key, 0));
        let content = modifier::split_block(state.current_content(), state.selection()).unwrap();
        state = state.push(content, EditorChangeType::SplitBlock);
    }
    assert_eq!(state.undo_stack_len(), 2);

    let oldest = state.undo().undo();
    assert_eq!(oldest.undo_stack_len(), 0);
    assert_eq!(oldest.current_content().block_map().len(), 7);
}

#[test]
fn test_disabled_history_swaps_content_only() {
    let state = editor().set_allow_undo(false);
    let typed = type_text(&state, "!");
    assert_eq!(text_of(&typed, "a"), "Alpha!");
    assert_eq!(typed.undo_stack_len(), 0);
    assert_eq!(text_of(&typed.undo(), "a"), "Alpha!");
}
