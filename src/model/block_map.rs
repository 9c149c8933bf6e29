//! The ordered block map.
//!
//! A `BlockMap` maps block keys to blocks in document order. For tree content
//! the order is a pre-order walk of the block forest. The map itself is shared
//! behind an `Rc`; deriving a new map clones only the table of block pointers,
//! so blocks that an edit does not touch are shared by both snapshots.

use super::block::ContentBlock;
use indexmap::IndexMap;
use std::rc::Rc;

/// Ordered, shared mapping from block key to block.
#[derive(Debug, Clone, Default)]
pub struct BlockMap {
    blocks: Rc<IndexMap<String, Rc<ContentBlock>>>,
}

impl BlockMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_index_map(blocks: IndexMap<String, Rc<ContentBlock>>) -> Self {
        Self {
            blocks: Rc::new(blocks),
        }
    }

    /// Builds a map from blocks in document order. Later duplicates of a key
    /// replace the earlier block in place.
    pub fn from_blocks<I>(blocks: I) -> Self
    where
        I: IntoIterator<Item = Rc<ContentBlock>>,
    {
        Self::from_index_map(
            blocks
                .into_iter()
                .map(|block| (block.key().to_string(), block))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&Rc<ContentBlock>> {
        self.blocks.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.blocks.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.blocks.get_index_of(key)
    }

    pub fn get_index(&self, index: usize) -> Option<&Rc<ContentBlock>> {
        self.blocks.get_index(index).map(|(_, block)| block)
    }

    pub fn first(&self) -> Option<&Rc<ContentBlock>> {
        self.get_index(0)
    }

    pub fn last(&self) -> Option<&Rc<ContentBlock>> {
        self.blocks.last().map(|(_, block)| block)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.blocks.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Rc<ContentBlock>> {
        self.blocks.values()
    }

    /// Key of the block preceding `key` in document order.
    pub fn key_before(&self, key: &str) -> Option<&str> {
        let index = self.index_of(key)?;
        index
            .checked_sub(1)
            .and_then(|i| self.get_index(i))
            .map(|block| block.key())
    }

    /// Key of the block following `key` in document order.
    pub fn key_after(&self, key: &str) -> Option<&str> {
        let index = self.index_of(key)?;
        self.get_index(index + 1).map(|block| block.key())
    }

    /// Blocks from `start_key` through `end_key` inclusive, in document order.
    pub fn range(&self, start_key: &str, end_key: &str) -> Option<Vec<Rc<ContentBlock>>> {
        let start = self.index_of(start_key)?;
        let end = self.index_of(end_key)?;
        if end < start {
            return None;
        }
        Some(self.blocks.values().skip(start).take(end - start + 1).cloned().collect())
    }

    /// Returns a map with each given block replacing the block of the same key,
    /// in place. Blocks with unknown keys are appended.
    pub fn with_blocks<I>(&self, blocks: I) -> Self
    where
        I: IntoIterator<Item = Rc<ContentBlock>>,
    {
        let mut next = (*self.blocks).clone();
        for block in blocks {
            next.insert(block.key().to_string(), block);
        }
        Self::from_index_map(next)
    }

    pub fn with_block(&self, block: Rc<ContentBlock>) -> Self {
        self.with_blocks(std::iter::once(block))
    }

    /// Returns a map without the block `key`, preserving the order of the rest.
    pub fn without(&self, key: &str) -> Self {
        let mut next = (*self.blocks).clone();
        next.shift_remove(key);
        Self::from_index_map(next)
    }

    pub fn to_vec(&self) -> Vec<Rc<ContentBlock>> {
        self.blocks.values().cloned().collect()
    }

    /// Whether both maps are the same shared table.
    pub fn ptr_eq(a: &BlockMap, b: &BlockMap) -> bool {
        Rc::ptr_eq(&a.blocks, &b.blocks)
    }
}

impl PartialEq for BlockMap {
    fn eq(&self, other: &Self) -> bool {
        if BlockMap::ptr_eq(self, other) {
            return true;
        }
        self.len() == other.len()
            && self
                .blocks
                .iter()
                .zip(other.blocks.iter())
                .all(|((ka, a), (kb, b))| ka == kb && (Rc::ptr_eq(a, b) || a == b))
    }
}

/// Builds block maps from ordered block lists.
pub struct BlockMapBuilder;

impl BlockMapBuilder {
    /// Map order is array order. Tree content must already be in pre-order.
    pub fn create_from_array(blocks: Vec<Rc<ContentBlock>>) -> BlockMap {
        BlockMap::from_blocks(blocks)
    }
}

/// Scans `items` for maximal runs of elements that `are_equal` considers
/// equal, calling `found(start, end)` for each run whose elements satisfy
/// `filter`. Runs are reported left to right; the final run is flushed after
/// the scan. An empty slice reports nothing.
pub fn find_ranges<T, E, F, C>(items: &[T], are_equal: E, filter: F, mut found: C)
where
    E: Fn(&T, &T) -> bool,
    F: Fn(&T) -> bool,
    C: FnMut(usize, usize),
{
    let Some(last) = items.last() else {
        return;
    };

    let mut cursor = 0;
    for index in 1..items.len() {
        let value = &items[index - 1];
        if !are_equal(value, &items[index]) {
            if filter(value) {
                found(cursor, index);
            }
            cursor = index;
        }
    }

    if filter(last) {
        found(cursor, items.len());
    }
}
