//! The high-level editing operations.
//!
//! Each function validates its selection against the snapshot, strips
//! non-mutable entities that the edit would cut, performs the change and
//! records the selection it was given as the result's `selection_before`.

use super::apply_entity::apply_entity_to_content_state;
use super::inline_style;
use super::insert_fragment::{insert_fragment_into_content_state, BlockDataMerge};
use super::insert_text::insert_text_into_content_state;
use super::modify_block;
use super::removal_range::get_character_removal_range;
use super::remove_entities::remove_entities_at_edges;
use super::remove_range::remove_range_from_content_state;
use super::split_block::split_block_in_content_state;
use super::{stamp_selection_before, RemovalDirection};
use crate::error::{invariant, Result};
use crate::model::block::BlockType;
use crate::model::block_map::BlockMap;
use crate::model::character::{CharacterMetadata, InlineStyle};
use crate::model::content_state::ContentState;
use crate::model::selection::SelectionState;
use crate::model::DataMap;
use std::rc::Rc;

/// Replaces the text covered by `range` with `text`, styled with `style` and
/// tagged with `entity_key`.
pub fn replace_text(
    content: &Rc<ContentState>,
    range: &SelectionState,
    text: &str,
    style: Option<InlineStyle>,
    entity_key: Option<&str>,
) -> Result<Rc<ContentState>> {
    content.validate_selection(range)?;
    let without_entities = remove_entities_at_edges(content, range)?;
    let without_text = remove_range_from_content_state(&without_entities, range)?;
    let character =
        CharacterMetadata::create(style.unwrap_or_default(), entity_key.map(str::to_string));
    let target = without_text.selection_after().clone();
    let inserted = insert_text_into_content_state(&without_text, &target, text, character)?;
    Ok(stamp_selection_before(content, inserted, range))
}

/// Inserts `text` at the collapsed `target`.
pub fn insert_text(
    content: &Rc<ContentState>,
    target: &SelectionState,
    text: &str,
    style: Option<InlineStyle>,
    entity_key: Option<&str>,
) -> Result<Rc<ContentState>> {
    invariant(
        target.is_collapsed(),
        "Target range must be collapsed for `insertText`.",
    )?;
    replace_text(content, target, text, style, entity_key)
}

/// Cuts the text under `removal_range` and inserts it at `target_range`,
/// which refers to positions after the removal.
pub fn move_text(
    content: &Rc<ContentState>,
    removal_range: &SelectionState,
    target_range: &SelectionState,
) -> Result<Rc<ContentState>> {
    content.validate_selection(removal_range)?;
    let moved = super::fragment::get_content_state_fragment(content, removal_range)?;
    let after_removal = remove_range(content, removal_range, RemovalDirection::Backward)?;
    replace_with_fragment(&after_removal, target_range, &moved)
}

/// Replaces the text covered by `target_range` with `fragment`.
pub fn replace_with_fragment(
    content: &Rc<ContentState>,
    target_range: &SelectionState,
    fragment: &BlockMap,
) -> Result<Rc<ContentState>> {
    replace_with_fragment_merging(content, target_range, fragment, BlockDataMerge::default())
}

/// [`replace_with_fragment`] with an explicit block data policy.
pub fn replace_with_fragment_merging(
    content: &Rc<ContentState>,
    target_range: &SelectionState,
    fragment: &BlockMap,
    merge: BlockDataMerge,
) -> Result<Rc<ContentState>> {
    content.validate_selection(target_range)?;
    let without_entities = remove_entities_at_edges(content, target_range)?;
    let without_text = remove_range_from_content_state(&without_entities, target_range)?;
    let target = without_text.selection_after().clone();
    let inserted = insert_fragment_into_content_state(&without_text, &target, fragment, merge)?;
    Ok(stamp_selection_before(content, inserted, target_range))
}

/// Removes the text covered by `range`.
///
/// Backward ranges are normalized first. A collapsed range removes nothing
/// and returns `content`. When the whole range lies inside one entity, the
/// range is widened to the entity (immutable) or its segments (segmented).
pub fn remove_range(
    content: &Rc<ContentState>,
    range: &SelectionState,
    direction: RemovalDirection,
) -> Result<Rc<ContentState>> {
    if range.is_collapsed() {
        return Ok(content.clone());
    }
    content.validate_selection(range)?;
    let range = range.forward();

    let start_block = content.block(range.start_key())?;
    let end_block = content.block(range.end_key())?;
    let start_entity = start_block.entity_at(range.start_offset());
    let end_entity = range
        .end_offset()
        .checked_sub(1)
        .and_then(|offset| end_block.entity_at(offset));

    if start_block.key() == end_block.key() && start_entity.is_some() && start_entity == end_entity
    {
        let adjusted = get_character_removal_range(
            content.entity_store(),
            start_block,
            end_block,
            &range,
            direction,
        )?;
        return remove_range_from_content_state(content, &adjusted);
    }

    let without_entities = remove_entities_at_edges(content, &range)?;
    remove_range_from_content_state(&without_entities, &range)
}

/// Splits the block at `selection`, removing any selected text first.
pub fn split_block(
    content: &Rc<ContentState>,
    selection: &SelectionState,
) -> Result<Rc<ContentState>> {
    content.validate_selection(selection)?;
    let without_entities = remove_entities_at_edges(content, selection)?;
    let without_text = remove_range_from_content_state(&without_entities, selection)?;
    let target = without_text.selection_after().clone();
    let split = split_block_in_content_state(&without_text, &target)?;
    Ok(stamp_selection_before(content, split, selection))
}

pub fn apply_inline_style(
    content: &Rc<ContentState>,
    selection: &SelectionState,
    style: &str,
) -> Result<Rc<ContentState>> {
    inline_style::add_inline_style(content, selection, style)
}

pub fn remove_inline_style(
    content: &Rc<ContentState>,
    selection: &SelectionState,
    style: &str,
) -> Result<Rc<ContentState>> {
    inline_style::remove_inline_style(content, selection, style)
}

pub fn set_block_type(
    content: &Rc<ContentState>,
    selection: &SelectionState,
    block_type: BlockType,
) -> Result<Rc<ContentState>> {
    modify_block::set_block_type(content, selection, block_type)
}

pub fn set_block_data(
    content: &Rc<ContentState>,
    selection: &SelectionState,
    data: &DataMap,
) -> Result<Rc<ContentState>> {
    modify_block::set_block_data(content, selection, data)
}

pub fn merge_block_data(
    content: &Rc<ContentState>,
    selection: &SelectionState,
    data: &DataMap,
) -> Result<Rc<ContentState>> {
    modify_block::merge_block_data(content, selection, data)
}

/// Tags the selected text with `entity_key`, or clears entities with `None`.
pub fn apply_entity(
    content: &Rc<ContentState>,
    selection: &SelectionState,
    entity_key: Option<&str>,
) -> Result<Rc<ContentState>> {
    let without_entities = remove_entities_at_edges(content, selection)?;
    let applied = apply_entity_to_content_state(&without_entities, selection, entity_key)?;
    Ok(stamp_selection_before(content, applied, selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entity::EntityMutability;
    use crate::testing::sample_content_state;

    fn styles(names: &[&str]) -> InlineStyle {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_replace_text_over_range() {
        let content = Rc::new(sample_content_state());
        let range = SelectionState::new("a", 1, "b", 2);
        let result = replace_text(&content, &range, "--", Some(styles(&["CODE"])), None).unwrap();
        let a = result.block("a").unwrap();
        assert_eq!(a.text(), "A--avo");
        assert!(a.character_list()[1].has_style("CODE"));
        assert!(!a.character_list()[1].has_style("BOLD"));
        // The image entity was cut, so its remainder is untagged.
        assert_eq!(a.entity_at(4), None);
        assert_eq!(result.selection_before(), &range);
        assert_eq!(result.selection_after(), &SelectionState::collapsed("a", 3));
        assert!(result.get_block_for_key("b").is_none());
    }

    #[test]
    fn test_insert_text_requires_collapsed_target() {
        let content = Rc::new(sample_content_state());
        let range = SelectionState::new("a", 1, "a", 2);
        assert!(insert_text(&content, &range, "x", None, None).is_err());

        let result =
            insert_text(&content, &SelectionState::collapsed("c", 4), "!", None, None).unwrap();
        assert_eq!(result.block("c").unwrap().text(), "Test!");
    }

    #[test]
    fn test_invalid_selection_is_rejected() {
        let content = Rc::new(sample_content_state());
        let range = SelectionState::new("a", 1, "missing", 0);
        assert!(replace_text(&content, &range, "x", None, None).is_err());
        let range = SelectionState::new("a", 1, "a", 9);
        assert!(remove_range(&content, &range, RemovalDirection::Forward).is_err());
    }

    #[test]
    fn test_remove_range_collapsed_is_identity() {
        let content = Rc::new(sample_content_state());
        let result = remove_range(
            &content,
            &SelectionState::collapsed("c", 1),
            RemovalDirection::Backward,
        )
        .unwrap();
        assert!(ContentState::ptr_eq(&content, &result));
    }

    #[test]
    fn test_remove_range_inside_immutable_entity_removes_it_whole() {
        let content = Rc::new(sample_content_state());
        let range = SelectionState::new("b", 1, "b", 3);
        let result = remove_range(&content, &range, RemovalDirection::Backward).unwrap();
        assert_eq!(result.block("b").unwrap().text(), "");
    }

    #[test]
    fn test_remove_range_normalizes_backward_selection() {
        let content = Rc::new(sample_content_state());
        let range = SelectionState::new("c", 2, "c", 0).with_is_backward(true);
        let result = remove_range(&content, &range, RemovalDirection::Backward).unwrap();
        assert_eq!(result.block("c").unwrap().text(), "st");
        assert_eq!(result.selection_after(), &SelectionState::collapsed("c", 0));
    }

    #[test]
    fn test_split_block_replaces_selection() {
        let content = Rc::new(sample_content_state());
        let range = SelectionState::new("c", 1, "c", 3);
        let result = split_block(&content, &range).unwrap();
        let blocks = result.get_blocks_as_array();
        let c_index = blocks.iter().position(|b| b.key() == "c").unwrap();
        assert_eq!(blocks[c_index].text(), "T");
        assert_eq!(blocks[c_index + 1].text(), "t");
        assert_eq!(result.selection_before(), &range);
    }

    #[test]
    fn test_move_text_between_blocks() {
        let content = Rc::new(sample_content_state());
        let removal = SelectionState::new("c", 0, "c", 2);
        let target = SelectionState::collapsed("f", 7);
        let result = move_text(&content, &removal, &target).unwrap();
        assert_eq!(result.block("c").unwrap().text(), "st");
        assert_eq!(result.block("f").unwrap().text(), "CharlieTe");
    }

    #[test]
    fn test_apply_entity_over_selection() {
        let content = Rc::new(sample_content_state());
        let key = content.create_entity("LINK", EntityMutability::Mutable, None);
        let range = SelectionState::new("c", 0, "c", 4);
        let result = apply_entity(&content, &range, Some(key.as_str())).unwrap();
        let c = result.block("c").unwrap();
        assert!((0..4).all(|i| c.entity_at(i) == Some(key.as_str())));
        assert_eq!(result.selection_before(), &range);
    }

    #[test]
    fn test_replace_with_fragment_keeps_data_policy() {
        let content = Rc::new(sample_content_state());
        let fragment = super::super::fragment::get_content_state_fragment(
            &content,
            &SelectionState::new("c", 0, "c", 4),
        )
        .unwrap();
        let result =
            replace_with_fragment(&content, &SelectionState::new("a", 0, "a", 5), &fragment)
                .unwrap();
        assert_eq!(result.block("a").unwrap().text(), "Test");
    }
}
