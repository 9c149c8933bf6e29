//! Edit-type tags recorded with every history transition.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What kind of edit produced a snapshot.
///
/// `push` uses the tag to decide whether consecutive edits coalesce into one
/// undo entry, and whether a pending inline style override survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditorChangeType {
    AdjustDepth,
    ApplyEntity,
    BackspaceCharacter,
    ChangeBlockData,
    ChangeBlockType,
    ChangeInlineStyle,
    MoveBlock,
    DeleteCharacter,
    InsertCharacters,
    InsertFragment,
    Redo,
    RemoveRange,
    SpellcheckChange,
    SplitBlock,
    Undo,
}

impl EditorChangeType {
    pub const ALL: [EditorChangeType; 15] = [
        EditorChangeType::AdjustDepth,
        EditorChangeType::ApplyEntity,
        EditorChangeType::BackspaceCharacter,
        EditorChangeType::ChangeBlockData,
        EditorChangeType::ChangeBlockType,
        EditorChangeType::ChangeInlineStyle,
        EditorChangeType::MoveBlock,
        EditorChangeType::DeleteCharacter,
        EditorChangeType::InsertCharacters,
        EditorChangeType::InsertFragment,
        EditorChangeType::Redo,
        EditorChangeType::RemoveRange,
        EditorChangeType::SpellcheckChange,
        EditorChangeType::SplitBlock,
        EditorChangeType::Undo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EditorChangeType::AdjustDepth => "adjust-depth",
            EditorChangeType::ApplyEntity => "apply-entity",
            EditorChangeType::BackspaceCharacter => "backspace-character",
            EditorChangeType::ChangeBlockData => "change-block-data",
            EditorChangeType::ChangeBlockType => "change-block-type",
            EditorChangeType::ChangeInlineStyle => "change-inline-style",
            EditorChangeType::MoveBlock => "move-block",
            EditorChangeType::DeleteCharacter => "delete-character",
            EditorChangeType::InsertCharacters => "insert-characters",
            EditorChangeType::InsertFragment => "insert-fragment",
            EditorChangeType::Redo => "redo",
            EditorChangeType::RemoveRange => "remove-range",
            EditorChangeType::SpellcheckChange => "spellcheck-change",
            EditorChangeType::SplitBlock => "split-block",
            EditorChangeType::Undo => "undo",
        }
    }

    /// Character-level edits that merge with an identical preceding edit.
    pub fn coalesces(&self) -> bool {
        matches!(
            self,
            EditorChangeType::InsertCharacters
                | EditorChangeType::BackspaceCharacter
                | EditorChangeType::DeleteCharacter
        )
    }

    /// Edits after which a pending inline style override still applies.
    pub fn keeps_style_override(&self) -> bool {
        matches!(
            self,
            EditorChangeType::AdjustDepth
                | EditorChangeType::ChangeBlockType
                | EditorChangeType::SplitBlock
        )
    }
}

impl fmt::Display for EditorChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditorChangeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|change| change.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown change type: {}", s))
    }
}
