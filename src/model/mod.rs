//! Immutable document model.
//!
//! The model is a set of persistent values: per-character metadata, blocks,
//! the ordered block map, selections, entities, and the `ContentState`
//! snapshot that ties them together. Every edit produces new values and shares
//! whatever it did not touch with the previous snapshot.
//!
//! # Modules
//!
//! - `character`: per-character style set + entity key, interned
//! - `block`: `ContentBlock` in flat and tree form
//! - `block_map`: ordered key → block mapping and range scanning
//! - `selection`: anchor/focus selection values
//! - `entity`: entity instances and the entity store
//! - `content_state`: the document snapshot
//! - `decorator`: hook for marking decorated text ranges

pub mod block;
pub mod block_map;
pub mod character;
pub mod content_state;
pub mod decorator;
pub mod entity;
pub mod selection;

/// Arbitrary key → JSON value data attached to blocks and entities.
pub type DataMap = indexmap::IndexMap<String, serde_json::Value>;
