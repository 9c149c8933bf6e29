//! Inserting text at a collapsed selection.

use crate::error::{invariant, Result};
use crate::model::block::{char_len, slice_chars, CharacterList};
use crate::model::character::CharacterMetadata;
use crate::model::content_state::ContentState;
use crate::model::selection::SelectionState;
use std::rc::Rc;

/// Inserts `text` at the collapsed `selection`, every new character carrying
/// `character`. The cursor ends up after the inserted text.
pub fn insert_text_into_content_state(
    content: &Rc<ContentState>,
    selection: &SelectionState,
    text: &str,
    character: Rc<CharacterMetadata>,
) -> Result<Rc<ContentState>> {
    invariant(
        selection.is_collapsed(),
        "`insertText` should only be called with a collapsed range.",
    )?;
    let len = char_len(text);
    if len == 0 {
        return Ok(content.clone());
    }
    content.validate_selection(selection)?;

    let key = selection.start_key();
    let offset = selection.start_offset();
    let block = content.block(key)?;

    let new_text = format!(
        "{}{}{}",
        slice_chars(block.text(), 0, offset),
        text,
        slice_chars(block.text(), offset, block.length())
    );
    let chars = block.character_list();
    let mut new_chars: CharacterList = Vec::with_capacity(chars.len() + len);
    new_chars.extend_from_slice(&chars[..offset]);
    new_chars.extend(std::iter::repeat(character).take(len));
    new_chars.extend_from_slice(&chars[offset..]);

    let new_block = (**block).clone().with_text(new_text, new_chars);
    let new_offset = offset + len;
    let after = selection
        .clone()
        .with_anchor_offset(new_offset)
        .with_focus_offset(new_offset);

    Ok(Rc::new(
        content
            .with_block_map(content.block_map().with_block(Rc::new(new_block)))
            .with_selection_before(selection.clone())
            .with_selection_after(after),
    ))
}
