//! Editor state and history.
//!
//! This module wraps the document model in the value an application holds:
//! the current snapshot, the selection, bounded undo/redo history and the
//! flags a host needs to render it.
//!
//! # Modules
//!
//! - `change`: edit-type tags recorded with every push
//! - `undo`: bounded undo/redo stacks of snapshots
//! - `state`: `EditorState` and its push/undo/redo transitions
//!
//! # Example
//!
//! ```
//! use draftquill::editor::change::EditorChangeType;
//! use draftquill::editor::state::EditorState;
//! use draftquill::transaction::modifier;
//!
//! let state = EditorState::create_empty();
//! let content = modifier::insert_text(
//!     state.current_content(),
//!     state.selection(),
//!     "Hello",
//!     None,
//!     None,
//! )
//! .unwrap();
//! let state = state.push(content, EditorChangeType::InsertCharacters);
//! assert_eq!(state.current_content().get_plain_text("\n"), "Hello");
//!
//! let state = state.undo();
//! assert_eq!(state.current_content().get_plain_text("\n"), "");
//! ```

pub mod change;
pub mod state;
pub mod undo;

pub use change::EditorChangeType;
pub use state::EditorState;
