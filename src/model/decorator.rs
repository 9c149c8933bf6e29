//! Decorators mark ranges of a block for special rendering.
//!
//! The core only stores the decorator an `EditorState` was created with and
//! hands it blocks on request; what a decoration looks like is up to the host.

use super::block::ContentBlock;
use super::content_state::ContentState;
use std::fmt::Debug;

/// Produces one optional decoration key per character of a block.
///
/// Characters sharing a key form one decorated range.
pub trait Decorator: Debug {
    fn decorations(&self, block: &ContentBlock, content: &ContentState) -> Vec<Option<String>>;
}

/// Decorates every range tagged with an entity of one type, such as `LINK`.
#[derive(Debug, Clone)]
pub struct EntityTypeDecorator {
    entity_type: String,
}

impl EntityTypeDecorator {
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
        }
    }
}

impl Decorator for EntityTypeDecorator {
    fn decorations(&self, block: &ContentBlock, content: &ContentState) -> Vec<Option<String>> {
        let mut keys = vec![None; block.length()];
        let mut count = 0;
        block.find_entity_ranges(
            |c| {
                c.entity()
                    .and_then(|key| content.get_entity(key).ok())
                    .is_some_and(|entity| entity.entity_type() == self.entity_type)
            },
            |start, end| {
                let key = format!("{}-{}-{}", block.key(), self.entity_type, count);
                count += 1;
                for slot in &mut keys[start..end] {
                    *slot = Some(key.clone());
                }
            },
        );
        keys
    }
}
