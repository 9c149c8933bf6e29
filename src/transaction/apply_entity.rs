//! Tagging characters with an entity.

use super::map_selected_characters;
use crate::error::Result;
use crate::model::block::{CharacterList, ContentBlock};
use crate::model::character::CharacterMetadata;
use crate::model::content_state::ContentState;
use crate::model::selection::SelectionState;
use std::rc::Rc;

/// Sets the entity of every selected character to `entity_key`, or clears it
/// when `entity_key` is `None`.
pub fn apply_entity_to_content_state(
    content: &Rc<ContentState>,
    selection: &SelectionState,
    entity_key: Option<&str>,
) -> Result<Rc<ContentState>> {
    map_selected_characters(content, selection, |c| {
        CharacterMetadata::apply_entity(c, entity_key)
    })
}

/// Sets the entity of characters `[start, end)` of `block`.
pub fn apply_entity_to_content_block(
    block: &ContentBlock,
    start: usize,
    end: usize,
    entity_key: Option<&str>,
) -> ContentBlock {
    let chars: CharacterList = block
        .character_list()
        .iter()
        .enumerate()
        .map(|(index, c)| {
            if (start..end).contains(&index) {
                CharacterMetadata::apply_entity(c, entity_key)
            } else {
                c.clone()
            }
        })
        .collect();
    block.clone().with_characters(chars)
}
