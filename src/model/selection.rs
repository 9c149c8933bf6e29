//! Selection values.
//!
//! A selection is an anchor (where the user started selecting) and a focus
//! (where they ended), each a block key plus a character offset. The
//! `is_backward` flag records whether the focus precedes the anchor in
//! document order; start and end are derived from it.
//!
//! # Example
//!
//! ```
//! use draftquill::model::selection::SelectionState;
//!
//! let cursor = SelectionState::create_empty("a");
//! assert!(cursor.is_collapsed());
//! assert_eq!(cursor.start_key(), "a");
//! assert_eq!(cursor.start_offset(), 0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    anchor_key: String,
    anchor_offset: usize,
    focus_key: String,
    focus_offset: usize,
    is_backward: bool,
    has_focus: bool,
}

impl SelectionState {
    /// A forward selection from anchor to focus, without focus.
    pub fn new(
        anchor_key: impl Into<String>,
        anchor_offset: usize,
        focus_key: impl Into<String>,
        focus_offset: usize,
    ) -> Self {
        Self {
            anchor_key: anchor_key.into(),
            anchor_offset,
            focus_key: focus_key.into(),
            focus_offset,
            is_backward: false,
            has_focus: false,
        }
    }

    /// A collapsed selection at offset 0 of `key`.
    pub fn create_empty(key: impl Into<String>) -> Self {
        Self::collapsed(key, 0)
    }

    /// A collapsed selection at `offset` of `key`.
    pub fn collapsed(key: impl Into<String>, offset: usize) -> Self {
        let key = key.into();
        Self::new(key.clone(), offset, key, offset)
    }

    pub fn anchor_key(&self) -> &str {
        &self.anchor_key
    }

    pub fn anchor_offset(&self) -> usize {
        self.anchor_offset
    }

    pub fn focus_key(&self) -> &str {
        &self.focus_key
    }

    pub fn focus_offset(&self) -> usize {
        self.focus_offset
    }

    pub fn is_backward(&self) -> bool {
        self.is_backward
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn start_key(&self) -> &str {
        if self.is_backward {
            &self.focus_key
        } else {
            &self.anchor_key
        }
    }

    pub fn start_offset(&self) -> usize {
        if self.is_backward {
            self.focus_offset
        } else {
            self.anchor_offset
        }
    }

    pub fn end_key(&self) -> &str {
        if self.is_backward {
            &self.anchor_key
        } else {
            &self.focus_key
        }
    }

    pub fn end_offset(&self) -> usize {
        if self.is_backward {
            self.anchor_offset
        } else {
            self.focus_offset
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor_key == self.focus_key && self.anchor_offset == self.focus_offset
    }

    /// Whether an edge of the selection lies within `[start, end]` of
    /// `block_key`.
    pub fn has_edge_within(&self, block_key: &str, start: usize, end: usize) -> bool {
        if self.anchor_key == self.focus_key && self.anchor_key == block_key {
            let selection_start = self.start_offset();
            let selection_end = self.end_offset();
            return (start <= selection_start && selection_start <= end)
                || (start <= selection_end && selection_end <= end);
        }

        if block_key != self.anchor_key && block_key != self.focus_key {
            return false;
        }

        let offset = if block_key == self.anchor_key {
            self.anchor_offset
        } else {
            self.focus_offset
        };
        start <= offset && end >= offset
    }

    /// The same range expressed forward (anchor at start, focus at end).
    pub fn forward(&self) -> Self {
        if !self.is_backward {
            return self.clone();
        }
        Self {
            anchor_key: self.focus_key.clone(),
            anchor_offset: self.focus_offset,
            focus_key: self.anchor_key.clone(),
            focus_offset: self.anchor_offset,
            is_backward: false,
            has_focus: self.has_focus,
        }
    }

    /// This selection collapsed to `offset` of `key`, keeping focus state.
    pub fn collapse_to(&self, key: impl Into<String>, offset: usize) -> Self {
        let key = key.into();
        Self {
            anchor_key: key.clone(),
            anchor_offset: offset,
            focus_key: key,
            focus_offset: offset,
            is_backward: false,
            has_focus: self.has_focus,
        }
    }

    pub fn with_anchor_key(mut self, key: impl Into<String>) -> Self {
        self.anchor_key = key.into();
        self
    }

    pub fn with_anchor_offset(mut self, offset: usize) -> Self {
        self.anchor_offset = offset;
        self
    }

    pub fn with_focus_key(mut self, key: impl Into<String>) -> Self {
        self.focus_key = key.into();
        self
    }

    pub fn with_focus_offset(mut self, offset: usize) -> Self {
        self.focus_offset = offset;
        self
    }

    pub fn with_is_backward(mut self, is_backward: bool) -> Self {
        self.is_backward = is_backward;
        self
    }

    pub fn with_has_focus(mut self, has_focus: bool) -> Self {
        self.has_focus = has_focus;
        self
    }
}

impl fmt::Display for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Anchor: {}:{}, Focus: {}:{}, Is Backward: {}, Has Focus: {}",
            self.anchor_key,
            self.anchor_offset,
            self.focus_key,
            self.focus_offset,
            self.is_backward,
            self.has_focus
        )
    }
}

/// The canonical "cursor at the start of `key`" selection.
pub fn make_empty_selection(key: &str) -> SelectionState {
    SelectionState::create_empty(key)
}
