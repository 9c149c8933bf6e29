//! The top-level editor value.
//!
//! An `EditorState` is the current `ContentState`, the selection, the undo
//! history and a handful of UI flags. Like everything else in the model it is
//! never mutated: `push`, `undo`, `redo` and the selection helpers return a new
//! state and leave the old one intact.

use super::change::EditorChangeType;
use super::undo::UndoHistory;
use crate::config::Config;
use crate::model::character::InlineStyle;
use crate::model::content_state::ContentState;
use crate::model::decorator::Decorator;
use crate::model::selection::SelectionState;
use std::rc::Rc;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct EditorState {
    current_content: Rc<ContentState>,
    selection: SelectionState,
    history: UndoHistory,
    allow_undo: bool,
    decorator: Option<Rc<dyn Decorator>>,
    force_selection: bool,
    in_composition_mode: bool,
    inline_style_override: Option<InlineStyle>,
    last_change_type: Option<EditorChangeType>,
    natively_rendered_content: Option<Rc<ContentState>>,
}

impl EditorState {
    /// An editor over a single empty block.
    pub fn create_empty() -> Self {
        Self::create_with_content(Rc::new(ContentState::create_from_text("")))
    }

    /// An editor over `content` with the cursor at the start of its first
    /// block. Content without blocks gets an empty editor instead.
    pub fn create_with_content(content: Rc<ContentState>) -> Self {
        Self::create_with_config(content, &Config::default())
    }

    /// Like [`create_with_content`](Self::create_with_content), taking the
    /// undo settings from `config`.
    pub fn create_with_config(content: Rc<ContentState>, config: &Config) -> Self {
        let content = if content.block_map().is_empty() {
            Rc::new(ContentState::create_from_text(""))
        } else {
            content
        };
        let selection = content
            .get_first_block()
            .map(|block| SelectionState::create_empty(block.key()))
            .unwrap_or_default();
        Self {
            current_content: content,
            selection,
            history: UndoHistory::new(config.undo_limit),
            allow_undo: config.allow_undo,
            decorator: None,
            force_selection: false,
            in_composition_mode: false,
            inline_style_override: None,
            last_change_type: None,
            natively_rendered_content: None,
        }
    }

    pub fn with_decorator(&self, decorator: Option<Rc<dyn Decorator>>) -> Self {
        Self {
            decorator,
            ..self.clone()
        }
    }

    pub fn current_content(&self) -> &Rc<ContentState> {
        &self.current_content
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn decorator(&self) -> Option<&Rc<dyn Decorator>> {
        self.decorator.as_ref()
    }

    pub fn allow_undo(&self) -> bool {
        self.allow_undo
    }

    pub fn undo_limit(&self) -> usize {
        self.history.limit()
    }

    pub fn undo_stack_len(&self) -> usize {
        self.history.undo_len()
    }

    pub fn redo_stack_len(&self) -> usize {
        self.history.redo_len()
    }

    /// The snapshot the next `undo` returns to.
    pub fn undo_peek(&self) -> Option<&Rc<ContentState>> {
        self.history.peek_undo()
    }

    pub fn last_change_type(&self) -> Option<EditorChangeType> {
        self.last_change_type
    }

    pub fn must_force_selection(&self) -> bool {
        self.force_selection
    }

    pub fn is_in_composition_mode(&self) -> bool {
        self.in_composition_mode
    }

    pub fn inline_style_override(&self) -> Option<&InlineStyle> {
        self.inline_style_override.as_ref()
    }

    pub fn natively_rendered_content(&self) -> Option<&Rc<ContentState>> {
        self.natively_rendered_content.as_ref()
    }

    pub fn set_allow_undo(&self, allow_undo: bool) -> Self {
        Self {
            allow_undo,
            ..self.clone()
        }
    }

    pub fn set_composition_mode(&self, in_composition_mode: bool) -> Self {
        Self {
            in_composition_mode,
            ..self.clone()
        }
    }

    /// Marks `content` as already reflected by the host's native rendering.
    pub fn set_natively_rendered_content(&self, content: Option<Rc<ContentState>>) -> Self {
        Self {
            natively_rendered_content: content,
            ..self.clone()
        }
    }

    /// Sets the style the next typed characters receive, regardless of the
    /// characters around the cursor.
    pub fn set_inline_style_override(&self, style: Option<InlineStyle>) -> Self {
        Self {
            inline_style_override: style,
            ..self.clone()
        }
    }

    /// Records `content` as the new current content, with a forced selection.
    pub fn push(&self, content: Rc<ContentState>, change_type: EditorChangeType) -> Self {
        self.push_with(content, change_type, true)
    }

    /// Records `content` as the new current content.
    ///
    /// Pushing the current content itself changes nothing. Otherwise the old
    /// content becomes an undo entry unless this edit continues a run of
    /// character edits of the same type at an unmoved selection, in which
    /// case the run keeps its original `selection_before`. The redo stack is
    /// cleared either way, and the selection moves to the new content's
    /// `selection_after`.
    pub fn push_with(
        &self,
        content: Rc<ContentState>,
        change_type: EditorChangeType,
        force_selection: bool,
    ) -> Self {
        if ContentState::ptr_eq(&self.current_content, &content) {
            trace!(change = %change_type, "push of unchanged content ignored");
            return self.clone();
        }

        let inline_style_override = if change_type.keeps_style_override() {
            self.inline_style_override.clone()
        } else {
            None
        };
        let selection = content.selection_after().clone();

        if !self.allow_undo {
            debug!(change = %change_type, "push without history");
            return Self {
                current_content: content,
                selection,
                force_selection,
                inline_style_override,
                last_change_type: Some(change_type),
                ..self.clone()
            };
        }

        let mut history = self.history.clone();
        let current = &self.current_content;
        let boundary = &self.selection != current.selection_after()
            || self.last_change_type != Some(change_type)
            || !change_type.coalesces();

        let new_content = if boundary {
            history.record(current.clone());
            Rc::new(content.with_selection_before(self.selection.clone()))
        } else {
            history.clear_redo();
            if content.selection_before() == current.selection_before() {
                content
            } else {
                Rc::new(content.with_selection_before(current.selection_before().clone()))
            }
        };
        debug!(
            change = %change_type,
            boundary,
            undo_depth = history.undo_len(),
            "pushed content"
        );

        Self {
            current_content: new_content,
            selection,
            history,
            force_selection,
            inline_style_override,
            last_change_type: Some(change_type),
            ..self.clone()
        }
    }

    /// Returns to the previous undo entry. The selection goes back to where it
    /// was before the undone edit.
    ///
    /// The selection comes from the undone content's `selection_before`, not
    /// from the restored entry.
    pub fn undo(&self) -> Self {
        if !self.allow_undo {
            return self.clone();
        }
        let mut history = self.history.clone();
        let Some(previous) = history.undo(self.current_content.clone()) else {
            trace!("nothing to undo");
            return self.clone();
        };
        debug!(undo_depth = history.undo_len(), redo_depth = history.redo_len(), "undo");
        Self {
            selection: self.current_content.selection_before().clone(),
            current_content: previous,
            history,
            force_selection: true,
            inline_style_override: None,
            last_change_type: Some(EditorChangeType::Undo),
            natively_rendered_content: None,
            ..self.clone()
        }
    }

    /// Re-applies the most recently undone entry.
    pub fn redo(&self) -> Self {
        if !self.allow_undo {
            return self.clone();
        }
        let mut history = self.history.clone();
        let Some(next) = history.redo(self.current_content.clone()) else {
            trace!("nothing to redo");
            return self.clone();
        };
        debug!(undo_depth = history.undo_len(), redo_depth = history.redo_len(), "redo");
        Self {
            selection: next.selection_after().clone(),
            current_content: next,
            history,
            force_selection: true,
            inline_style_override: None,
            last_change_type: Some(EditorChangeType::Redo),
            natively_rendered_content: None,
            ..self.clone()
        }
    }

    /// Takes a selection reported by the host without forcing it back.
    pub fn accept_selection(&self, selection: SelectionState) -> Self {
        Self {
            selection,
            force_selection: false,
            ..self.clone()
        }
    }

    /// Sets a selection the host must render, giving it focus.
    pub fn force_selection(&self, selection: SelectionState) -> Self {
        Self {
            selection: selection.with_has_focus(true),
            force_selection: true,
            natively_rendered_content: None,
            inline_style_override: None,
            ..self.clone()
        }
    }

    /// Collapses the selection at the end of the last block.
    pub fn move_selection_to_end(&self) -> Self {
        let selection = match self.current_content.get_last_block() {
            Some(block) => SelectionState::collapsed(block.key(), block.length()),
            None => return self.clone(),
        };
        self.accept_selection(selection)
    }

    /// Moves the cursor to the end and forces focus there.
    pub fn move_focus_to_end(&self) -> Self {
        let moved = self.move_selection_to_end();
        let selection = moved.selection.clone();
        moved.force_selection(selection)
    }

    /// The style typed text would receive at the current selection.
    ///
    /// An override wins. Otherwise a collapsed cursor takes the style of the
    /// character before it (or the first character of its block), and a range
    /// takes the style of its first character. Empty positions inherit from
    /// the last character of the nearest non-empty block above.
    pub fn get_current_inline_style(&self) -> InlineStyle {
        if let Some(style) = &self.inline_style_override {
            return style.clone();
        }
        let content = &self.current_content;
        let key = self.selection.start_key();
        let offset = self.selection.start_offset();
        let Some(block) = content.get_block_for_key(key) else {
            return InlineStyle::new();
        };

        if self.selection.is_collapsed() {
            if offset > 0 {
                return block.inline_style_at(offset - 1);
            }
            if block.length() > 0 {
                return block.inline_style_at(0);
            }
        } else {
            if offset < block.length() {
                return block.inline_style_at(offset);
            }
            if offset > 0 {
                return block.inline_style_at(offset - 1);
            }
        }
        self.look_upward_for_inline_style(key)
    }

    fn look_upward_for_inline_style(&self, from_key: &str) -> InlineStyle {
        self.current_content
            .block_map()
            .iter()
            .rev()
            .skip_while(|block| block.key() != from_key)
            .skip(1)
            .find(|block| block.length() > 0)
            .map(|block| block.inline_style_at(block.length() - 1))
            .unwrap_or_default()
    }

    pub fn is_selection_at_start_of_content(&self) -> bool {
        match self.current_content.get_first_block() {
            Some(first) => self.selection.has_edge_within(first.key(), 0, 0),
            None => true,
        }
    }

    pub fn is_selection_at_end_of_content(&self) -> bool {
        match self.current_content.get_last_block() {
            Some(last) => {
                let end = last.length();
                self.selection.has_edge_within(last.key(), end, end)
            }
            None => true,
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::create_empty()
    }
}
