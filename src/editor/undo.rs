//! Bounded undo/redo history.
//!
//! The history holds whole `ContentState` snapshots. Snapshots share every
//! untouched block, so an entry costs little more than the blocks its edit
//! replaced.
//!
//! # Architecture
//!
//! - `undo`: snapshots to return to, newest last
//! - `redo`: snapshots undone, newest last
//! - `limit`: maximum undo depth; the oldest entry is dropped past it

use crate::model::content_state::ContentState;
use std::collections::VecDeque;
use std::rc::Rc;

/// Undo and redo stacks for one editor session.
///
/// # Example
///
/// ```
/// use draftquill::editor::undo::UndoHistory;
/// use draftquill::model::content_state::ContentState;
/// use std::rc::Rc;
///
/// let mut history = UndoHistory::new(2);
/// for text in ["one", "two", "three"] {
///     history.record(Rc::new(ContentState::create_from_text(text)));
/// }
/// assert_eq!(history.undo_len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct UndoHistory {
    undo: VecDeque<Rc<ContentState>>,
    redo: Vec<Rc<ContentState>>,
    limit: usize,
}

impl UndoHistory {
    /// Creates an empty history keeping at most `limit` undo entries.
    /// A limit of 0 keeps every entry.
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// The snapshot `undo` would return to.
    pub fn peek_undo(&self) -> Option<&Rc<ContentState>> {
        self.undo.back()
    }

    pub fn peek_redo(&self) -> Option<&Rc<ContentState>> {
        self.redo.last()
    }

    /// Records `previous` as an undo point and forgets the redo stack.
    pub fn record(&mut self, previous: Rc<ContentState>) {
        self.undo.push_back(previous);
        if self.limit > 0 {
            while self.undo.len() > self.limit {
                self.undo.pop_front();
            }
        }
        self.redo.clear();
    }

    /// Forgets the redo stack without recording anything.
    pub fn clear_redo(&mut self) {
        self.redo.clear();
    }

    /// Pops the newest undo entry, parking `current` on the redo stack.
    pub fn undo(&mut self, current: Rc<ContentState>) -> Option<Rc<ContentState>> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Pops the newest redo entry, parking `current` on the undo stack.
    pub fn redo(&mut self, current: Rc<ContentState>) -> Option<Rc<ContentState>> {
        let next = self.redo.pop()?;
        self.undo.push_back(current);
        Some(next)
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_UNDO_LIMIT)
    }
}
