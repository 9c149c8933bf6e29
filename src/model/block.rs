//! Content blocks.
//!
//! A `ContentBlock` is one paragraph-level unit of the document: its text, one
//! `CharacterMetadata` per character, a block type, a depth and free-form data.
//! Blocks created while tree data support is on additionally carry
//! [`BlockLinks`]: parent, children and sibling keys that arrange the blocks of
//! a document into a forest.
//!
//! Offsets into a block are counted in Unicode scalar values (`char`s), and the
//! character list always has exactly one entry per `char` of the text.
//!
//! # Example
//!
//! ```
//! use draftquill::model::block::{BlockType, ContentBlock};
//!
//! let block = ContentBlock::new("a", BlockType::Unstyled, "Hello");
//! assert_eq!(block.length(), 5);
//! assert_eq!(block.character_list().len(), 5);
//! assert!(!block.is_tree_block());
//! ```

use super::block_map::find_ranges;
use super::character::{CharacterMetadata, InlineStyle};
use super::DataMap;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// One `CharacterMetadata` per character of a block.
pub type CharacterList = Vec<Rc<CharacterMetadata>>;

/// The kind of a block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    #[default]
    Unstyled,
    Paragraph,
    HeaderOne,
    HeaderTwo,
    HeaderThree,
    HeaderFour,
    HeaderFive,
    HeaderSix,
    UnorderedListItem,
    OrderedListItem,
    Blockquote,
    CodeBlock,
    Atomic,
    /// Any host-defined block type.
    Custom(String),
}

impl BlockType {
    pub fn as_str(&self) -> &str {
        match self {
            BlockType::Unstyled => "unstyled",
            BlockType::Paragraph => "paragraph",
            BlockType::HeaderOne => "header-one",
            BlockType::HeaderTwo => "header-two",
            BlockType::HeaderThree => "header-three",
            BlockType::HeaderFour => "header-four",
            BlockType::HeaderFive => "header-five",
            BlockType::HeaderSix => "header-six",
            BlockType::UnorderedListItem => "unordered-list-item",
            BlockType::OrderedListItem => "ordered-list-item",
            BlockType::Blockquote => "blockquote",
            BlockType::CodeBlock => "code-block",
            BlockType::Atomic => "atomic",
            BlockType::Custom(name) => name,
        }
    }

    pub fn is_list_item(&self) -> bool {
        matches!(
            self,
            BlockType::UnorderedListItem | BlockType::OrderedListItem
        )
    }
}

impl From<&str> for BlockType {
    fn from(value: &str) -> Self {
        match value {
            "unstyled" => BlockType::Unstyled,
            "paragraph" => BlockType::Paragraph,
            "header-one" => BlockType::HeaderOne,
            "header-two" => BlockType::HeaderTwo,
            "header-three" => BlockType::HeaderThree,
            "header-four" => BlockType::HeaderFour,
            "header-five" => BlockType::HeaderFive,
            "header-six" => BlockType::HeaderSix,
            "unordered-list-item" => BlockType::UnorderedListItem,
            "ordered-list-item" => BlockType::OrderedListItem,
            "blockquote" => BlockType::Blockquote,
            "code-block" => BlockType::CodeBlock,
            "atomic" => BlockType::Atomic,
            other => BlockType::Custom(other.to_string()),
        }
    }
}

impl From<String> for BlockType {
    fn from(value: String) -> Self {
        BlockType::from(value.as_str())
    }
}

impl From<BlockType> for String {
    fn from(value: BlockType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tree links of a block that lives in a block forest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockLinks {
    pub parent: Option<String>,
    pub children: Vec<String>,
    pub prev_sibling: Option<String>,
    pub next_sibling: Option<String>,
}

/// A block of text with per-character metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    key: String,
    block_type: BlockType,
    text: String,
    depth: usize,
    character_list: CharacterList,
    data: DataMap,
    links: Option<BlockLinks>,
}

impl ContentBlock {
    /// Creates a flat block whose characters carry no style or entity.
    pub fn new(key: impl Into<String>, block_type: BlockType, text: impl Into<String>) -> Self {
        let text = text.into();
        let character_list = vec![CharacterMetadata::empty(); char_len(&text)];
        Self {
            key: key.into(),
            block_type,
            text,
            depth: 0,
            character_list,
            data: DataMap::new(),
            links: None,
        }
    }

    /// Creates a tree block with no parent, children or siblings.
    pub fn new_tree(
        key: impl Into<String>,
        block_type: BlockType,
        text: impl Into<String>,
    ) -> Self {
        Self::new(key, block_type, text).with_links(Some(BlockLinks::default()))
    }

    /// Creates an empty `unstyled` block.
    pub fn empty(key: impl Into<String>) -> Self {
        Self::new(key, BlockType::Unstyled, "")
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn block_type(&self) -> &BlockType {
        &self.block_type
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the text in characters.
    pub fn length(&self) -> usize {
        self.character_list.len()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn character_list(&self) -> &CharacterList {
        &self.character_list
    }

    pub fn data(&self) -> &DataMap {
        &self.data
    }

    pub fn links(&self) -> Option<&BlockLinks> {
        self.links.as_ref()
    }

    /// Whether this block participates in a block forest.
    pub fn is_tree_block(&self) -> bool {
        self.links.is_some()
    }

    pub fn parent_key(&self) -> Option<&str> {
        self.links.as_ref().and_then(|l| l.parent.as_deref())
    }

    pub fn child_keys(&self) -> &[String] {
        self.links.as_ref().map(|l| l.children.as_slice()).unwrap_or(&[])
    }

    pub fn prev_sibling_key(&self) -> Option<&str> {
        self.links.as_ref().and_then(|l| l.prev_sibling.as_deref())
    }

    pub fn next_sibling_key(&self) -> Option<&str> {
        self.links.as_ref().and_then(|l| l.next_sibling.as_deref())
    }

    /// Style set of the character at `offset`, empty when out of range.
    pub fn inline_style_at(&self, offset: usize) -> InlineStyle {
        self.character_list
            .get(offset)
            .map(|c| c.style().clone())
            .unwrap_or_default()
    }

    /// Entity key of the character at `offset`, if any.
    pub fn entity_at(&self, offset: usize) -> Option<&str> {
        self.character_list.get(offset).and_then(|c| c.entity())
    }

    /// Calls `callback(start, end)` for each maximal run of characters with the
    /// same style set for which `filter` holds.
    pub fn find_style_ranges<F, C>(&self, filter: F, callback: C)
    where
        F: Fn(&Rc<CharacterMetadata>) -> bool,
        C: FnMut(usize, usize),
    {
        find_ranges(
            &self.character_list,
            |a, b| Rc::ptr_eq(a, b) || a.style() == b.style(),
            filter,
            callback,
        );
    }

    /// Calls `callback(start, end)` for each maximal run of characters with the
    /// same entity key for which `filter` holds.
    pub fn find_entity_ranges<F, C>(&self, filter: F, callback: C)
    where
        F: Fn(&Rc<CharacterMetadata>) -> bool,
        C: FnMut(usize, usize),
    {
        find_ranges(
            &self.character_list,
            |a, b| a.entity() == b.entity(),
            filter,
            callback,
        );
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_type(mut self, block_type: BlockType) -> Self {
        self.block_type = block_type;
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_data(mut self, data: DataMap) -> Self {
        self.data = data;
        self
    }

    /// Replaces text and characters together.
    pub fn with_text(mut self, text: impl Into<String>, character_list: CharacterList) -> Self {
        self.text = text.into();
        debug_assert_eq!(char_len(&self.text), character_list.len());
        self.character_list = character_list;
        self
    }

    /// Replaces the character list of an unchanged text.
    pub fn with_characters(mut self, character_list: CharacterList) -> Self {
        debug_assert_eq!(self.character_list.len(), character_list.len());
        self.character_list = character_list;
        self
    }

    pub fn with_links(mut self, links: Option<BlockLinks>) -> Self {
        self.links = links;
        self
    }

    /// Sets the parent key of a tree block. Flat blocks are returned unchanged.
    pub fn with_parent(mut self, parent: Option<String>) -> Self {
        if let Some(links) = self.links.as_mut() {
            links.parent = parent;
        }
        self
    }
}

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Characters `[start, end)` of `text`.
pub fn slice_chars(text: &str, start: usize, end: usize) -> String {
    text.chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect()
}
