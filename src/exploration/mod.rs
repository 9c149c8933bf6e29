//! Read-only traversal helpers used by the transaction layer.
//!
//! - `tree`: block-forest navigation and link repair
//! - `entity`: entity ranges within a block, entity continuation
//! - `segments`: word-segment removal for segmented entities
//! - `word`: removable word lengths for word-wise deletion

pub mod entity;
pub mod segments;
pub mod tree;
pub mod word;

pub use entity::{get_entity_key_for_selection, get_ranges_for_entity, EntityRange};
pub use tree::{
    get_ancestor_keys, get_descendant_keys, get_next_delimiter_block_key, is_descendant_of,
};
