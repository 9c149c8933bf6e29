//! Adding and removing inline styles over a selection.

use super::map_selected_characters;
use crate::error::Result;
use crate::model::character::CharacterMetadata;
use crate::model::content_state::ContentState;
use crate::model::selection::SelectionState;
use std::rc::Rc;

pub fn add_inline_style(
    content: &Rc<ContentState>,
    selection: &SelectionState,
    style: &str,
) -> Result<Rc<ContentState>> {
    map_selected_characters(content, selection, |c| {
        CharacterMetadata::apply_style(c, style)
    })
}

pub fn remove_inline_style(
    content: &Rc<ContentState>,
    selection: &SelectionState,
    style: &str,
) -> Result<Rc<ContentState>> {
    map_selected_characters(content, selection, |c| {
        CharacterMetadata::remove_style(c, style)
    })
}
