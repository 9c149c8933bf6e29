use std::rc::Rc;

use draftquill::error::{DraftError, Result};
use draftquill::model::content_state::ContentState;
use draftquill::model::selection::SelectionState;
use draftquill::testing::{sample_content_state, tree_content_state};
use draftquill::transaction::move_block::{move_block_in_content_state, InsertionMode};

fn move_block(
    content: &Rc<ContentState>,
    key: &str,
    target: &str,
    mode: InsertionMode,
) -> Result<Rc<ContentState>> {
    let block = content.block(key)?.clone();
    let target = content.block(target)?.clone();
    move_block_in_content_state(content, &block, &target, mode)
}

fn keys(content: &ContentState) -> Vec<&str> {
    content.block_map().keys().collect()
}

#[test]
fn test_move_before_and_after() {
    let content = Rc::new(sample_content_state());

    let moved = move_block(&content, "f", "b", InsertionMode::Before).unwrap();
    assert_eq!(keys(&moved), vec!["a", "f", "b", "c", "d", "e"]);

    let moved = move_block(&content, "a", "d", InsertionMode::After).unwrap();
    assert_eq!(keys(&moved), vec!["b", "c", "d", "a", "e", "f"]);
}

#[test]
fn test_selection_collapses_on_moved_block() {
    let content = Rc::new(sample_content_state());
    let moved = move_block(&content, "c", "f", InsertionMode::After).unwrap();
    assert_eq!(moved.selection_before(), content.selection_after());
    assert_eq!(
        moved.selection_after(),
        &SelectionState::collapsed("c", 0).with_has_focus(true)
    );
}

#[test]
fn test_moving_next_to_itself_fails_in_both_directions() {
    let content = Rc::new(sample_content_state());
    for mode in [InsertionMode::Before, InsertionMode::After] {
        assert!(matches!(
            move_block(&content, "c", "c", mode),
            Err(DraftError::Invariant(_))
        ));
    }
    assert!(matches!(
        move_block(&content, "a", "b", InsertionMode::Before),
        Err(DraftError::Invariant(_))
    ));
    assert!(matches!(
        move_block(&content, "b", "a", InsertionMode::After),
        Err(DraftError::Invariant(_))
    ));
}

#[test]
fn test_replace_mode_is_rejected() {
    let content = Rc::new(sample_content_state());
    let err = move_block(&content, "a", "f", InsertionMode::Replace).unwrap_err();
    assert_eq!(err.to_string(), "Invariant violation: Replacing blocks is not supported.");
}

#[test]
fn test_tree_move_carries_children() {
    let content = Rc::new(tree_content_state());
    let moved = move_block(&content, "container", "alpha", InsertionMode::Before).unwrap();
    assert_eq!(keys(&moved), vec!["container", "bravo", "charlie", "alpha", "delta"]);

    let container = moved.block("container").unwrap();
    assert_eq!(container.prev_sibling_key(), None);
    assert_eq!(container.next_sibling_key(), Some("alpha"));
    assert_eq!(moved.block("bravo").unwrap().parent_key(), Some("container"));
    assert_eq!(moved.block("delta").unwrap().prev_sibling_key(), Some("alpha"));
}

#[test]
fn test_tree_move_after_skips_target_subtree() {
    let content = Rc::new(tree_content_state());
    let moved = move_block(&content, "alpha", "container", InsertionMode::After).unwrap();
    assert_eq!(keys(&moved), vec!["container", "bravo", "charlie", "alpha", "delta"]);
    assert_eq!(moved.block("alpha").unwrap().parent_key(), None);
}

#[test]
fn test_tree_move_into_child_list() {
    let content = Rc::new(tree_content_state());
    let moved = move_block(&content, "delta", "charlie", InsertionMode::Before).unwrap();
    assert_eq!(keys(&moved), vec!["alpha", "container", "bravo", "delta", "charlie"]);
    assert_eq!(moved.block("delta").unwrap().parent_key(), Some("container"));
    assert_eq!(
        moved.block("container").unwrap().child_keys(),
        ["bravo".to_string(), "delta".to_string(), "charlie".to_string()]
    );
}

#[test]
fn test_tree_move_into_own_descendant_fails() {
    let content = Rc::new(tree_content_state());
    assert!(matches!(
        move_block(&content, "container", "bravo", InsertionMode::After),
        Err(DraftError::Invariant(_))
    ));
}
