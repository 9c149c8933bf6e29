//! The document snapshot.
//!
//! A `ContentState` is a block map, the entity store it refers to, and the
//! selections before and after the edit that produced it. Snapshots are never
//! mutated; transformations return new snapshots, and a transformation that
//! changes nothing returns the very `Rc` it was given so callers can detect
//! no-ops with [`ContentState::ptr_eq`].
//!
//! # Example
//!
//! ```
//! use draftquill::model::content_state::ContentState;
//!
//! let content = ContentState::create_from_text("Hello\nWorld");
//! assert_eq!(content.block_map().len(), 2);
//! assert_eq!(content.get_plain_text("\n"), "Hello\nWorld");
//! ```

use super::block::{BlockType, ContentBlock};
use super::block_map::{BlockMap, BlockMapBuilder};
use super::entity::{DraftEntityInstance, EntityMutability, EntityStore};
use super::selection::SelectionState;
use super::DataMap;
use crate::error::{DraftError, Result};
use crate::exploration::tree::relink_tree;
use crate::gate;
use crate::keys::generate_random_key;
use std::rc::Rc;

/// What an import adapter (HTML, clipboard) hands to the core.
#[derive(Debug, Clone)]
pub struct ImportedContent {
    pub content_blocks: Vec<Rc<ContentBlock>>,
    pub entity_map: Rc<EntityStore>,
}

#[derive(Debug, Clone)]
pub struct ContentState {
    entity_store: Rc<EntityStore>,
    block_map: BlockMap,
    selection_before: SelectionState,
    selection_after: SelectionState,
}

impl ContentState {
    pub fn new(
        block_map: BlockMap,
        selection_before: SelectionState,
        selection_after: SelectionState,
        entity_store: Rc<EntityStore>,
    ) -> Self {
        Self {
            entity_store,
            block_map,
            selection_before,
            selection_after,
        }
    }

    /// Builds a snapshot from blocks in document order, with both selections
    /// collapsed at the start of the first block.
    pub fn create_from_block_array<I, B>(blocks: I, entity_store: Option<Rc<EntityStore>>) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Rc<ContentBlock>>,
    {
        let block_map =
            BlockMapBuilder::create_from_array(blocks.into_iter().map(Into::into).collect());
        let selection = block_map
            .first()
            .map(|block| SelectionState::create_empty(block.key()))
            .unwrap_or_default();
        Self::new(
            block_map,
            selection.clone(),
            selection,
            entity_store.unwrap_or_else(|| Rc::new(EntityStore::new())),
        )
    }

    /// One unstyled block per line; `\r\n`, `\r` and `\n` all end a line.
    pub fn create_from_text(text: &str) -> Self {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        Self::create_from_text_with_delimiter(&normalized, "\n")
    }

    /// One unstyled block per `delimiter`-separated piece of `text`.
    pub fn create_from_text_with_delimiter(text: &str, delimiter: &str) -> Self {
        let tree = gate::tree_data_support();
        let blocks: Vec<Rc<ContentBlock>> = text
            .split(delimiter)
            .map(|line| {
                let line = line.replace('\r', "");
                let block = if tree {
                    ContentBlock::new_tree(generate_random_key(), BlockType::Unstyled, line)
                } else {
                    ContentBlock::new(generate_random_key(), BlockType::Unstyled, line)
                };
                Rc::new(block)
            })
            .collect();
        let blocks = if tree {
            let lineage = BlockMap::from_blocks(blocks.clone());
            relink_tree(blocks, &lineage).to_vec()
        } else {
            blocks
        };
        Self::create_from_block_array(blocks, None)
    }

    /// Builds a snapshot from the output of an import adapter.
    pub fn from_imported(imported: ImportedContent) -> Self {
        Self::create_from_block_array(imported.content_blocks, Some(imported.entity_map))
    }

    pub fn entity_store(&self) -> &Rc<EntityStore> {
        &self.entity_store
    }

    pub fn block_map(&self) -> &BlockMap {
        &self.block_map
    }

    pub fn selection_before(&self) -> &SelectionState {
        &self.selection_before
    }

    pub fn selection_after(&self) -> &SelectionState {
        &self.selection_after
    }

    pub fn get_block_for_key(&self, key: &str) -> Option<&Rc<ContentBlock>> {
        self.block_map.get(key)
    }

    /// Like [`get_block_for_key`](Self::get_block_for_key), but a missing
    /// block is an error.
    pub fn block(&self, key: &str) -> Result<&Rc<ContentBlock>> {
        self.block_map
            .get(key)
            .ok_or_else(|| DraftError::BlockNotFound(key.to_string()))
    }

    pub fn get_key_before(&self, key: &str) -> Option<&str> {
        self.block_map.key_before(key)
    }

    pub fn get_key_after(&self, key: &str) -> Option<&str> {
        self.block_map.key_after(key)
    }

    pub fn get_block_before(&self, key: &str) -> Option<&Rc<ContentBlock>> {
        self.get_key_before(key).and_then(|k| self.block_map.get(k))
    }

    pub fn get_block_after(&self, key: &str) -> Option<&Rc<ContentBlock>> {
        self.get_key_after(key).and_then(|k| self.block_map.get(k))
    }

    pub fn get_blocks_as_array(&self) -> Vec<Rc<ContentBlock>> {
        self.block_map.to_vec()
    }

    pub fn get_first_block(&self) -> Option<&Rc<ContentBlock>> {
        self.block_map.first()
    }

    pub fn get_last_block(&self) -> Option<&Rc<ContentBlock>> {
        self.block_map.last()
    }

    pub fn get_plain_text(&self, delimiter: &str) -> String {
        self.block_map
            .iter()
            .map(|block| block.text())
            .collect::<Vec<_>>()
            .join(delimiter)
    }

    /// Whether the document holds anything beyond a single empty block.
    /// Zero-width spaces do not count as text.
    pub fn has_text(&self) -> bool {
        self.block_map.len() > 1
            || self
                .block_map
                .first()
                .map(|block| block.text().chars().any(|c| c != '\u{200B}'))
                .unwrap_or(false)
    }

    /// Checks that both edges of `selection` point inside existing blocks.
    pub fn validate_selection(&self, selection: &SelectionState) -> Result<()> {
        for (key, offset) in [
            (selection.anchor_key(), selection.anchor_offset()),
            (selection.focus_key(), selection.focus_offset()),
        ] {
            let block = self.block(key)?;
            if offset > block.length() {
                return Err(DraftError::InvalidSelection {
                    key: key.to_string(),
                    offset,
                    length: block.length(),
                });
            }
        }
        Ok(())
    }

    pub fn with_block_map(&self, block_map: BlockMap) -> Self {
        Self {
            block_map,
            ..self.clone()
        }
    }

    pub fn with_selection_before(&self, selection: SelectionState) -> Self {
        Self {
            selection_before: selection,
            ..self.clone()
        }
    }

    pub fn with_selection_after(&self, selection: SelectionState) -> Self {
        Self {
            selection_after: selection,
            ..self.clone()
        }
    }

    pub fn create_entity(
        &self,
        entity_type: &str,
        mutability: EntityMutability,
        data: Option<DataMap>,
    ) -> String {
        self.entity_store.create(entity_type, mutability, data)
    }

    pub fn add_entity(&self, instance: DraftEntityInstance) -> String {
        self.entity_store.add(instance)
    }

    pub fn get_entity(&self, key: &str) -> Result<DraftEntityInstance> {
        self.entity_store.get(key)
    }

    pub fn merge_entity_data(&self, key: &str, partial: &DataMap) -> Result<DraftEntityInstance> {
        self.entity_store.merge_data(key, partial)
    }

    pub fn replace_entity_data(&self, key: &str, data: DataMap) -> Result<DraftEntityInstance> {
        self.entity_store.replace_data(key, data)
    }

    pub fn get_last_created_entity_key(&self) -> String {
        self.entity_store.last_created_entity_key()
    }

    /// Whether both handles are the same snapshot.
    pub fn ptr_eq(a: &Rc<ContentState>, b: &Rc<ContentState>) -> bool {
        Rc::ptr_eq(a, b)
    }
}

impl PartialEq for ContentState {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.entity_store, &other.entity_store)
            && self.block_map == other.block_map
            && self.selection_before == other.selection_before
            && self.selection_after == other.selection_after
    }
}
