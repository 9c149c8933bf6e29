//! DraftQuill - an immutable rich-text document model with a transactional
//! editing core.
//!
//! # Modules
//!
//! - `model`: blocks, character metadata, selections, entities and content snapshots
//! - `transaction`: pure edits from one content snapshot to the next
//! - `editor`: the editor state value with undo/redo history
//! - `exploration`: read-only queries over blocks (words, entities, trees)
//! - `raw`: conversion to and from the raw JSON interchange format
//! - `keys`: block key generation
//! - `gate`: runtime feature flags
//! - `config`: TOML configuration
//! - `error`: the error type shared by every module
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use draftquill::editor::{EditorChangeType, EditorState};
//! use draftquill::model::content_state::ContentState;
//! use draftquill::transaction::modifier;
//!
//! let content = Rc::new(ContentState::create_from_text("Hello"));
//! let editor = EditorState::create_with_content(content);
//!
//! let key = editor.current_content().get_first_block().unwrap().key().to_string();
//! let selection = editor.selection().collapse_to(key, 5);
//! let edited = modifier::insert_text(
//!     editor.current_content(),
//!     &selection,
//!     " world",
//!     None,
//!     None,
//! )
//! .unwrap();
//! let editor = editor.push(edited, EditorChangeType::InsertCharacters);
//!
//! assert_eq!(editor.current_content().get_plain_text("\n"), "Hello world");
//! let editor = editor.undo();
//! assert_eq!(editor.current_content().get_plain_text("\n"), "Hello");
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod exploration;
pub mod gate;
pub mod keys;
pub mod model;
pub mod raw;
#[doc(hidden)]
pub mod testing;
pub mod transaction;
