//! Entities and the entity store.
//!
//! An entity is out-of-band annotation (a link, an image, a mention) attached
//! to a run of characters by key. The `EntityStore` issues keys from a counter
//! that only moves forward: keys are never reused, and looking up a key that
//! was never issued is an error rather than an empty result.
//!
//! One store is shared, through an `Rc`, by every `ContentState` derived from
//! the same document session.
//!
//! # Example
//!
//! ```
//! use draftquill::model::entity::{EntityMutability, EntityStore};
//!
//! let store = EntityStore::new();
//! let key = store.create("LINK", EntityMutability::Mutable, None);
//! let entity = store.get(&key).unwrap();
//! assert_eq!(entity.entity_type(), "LINK");
//! assert!(store.get("999").is_err());
//! ```

use super::DataMap;
use crate::error::{DraftError, Result};
use crate::keys::generate_uuid;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;

/// How text tagged with an entity behaves under editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityMutability {
    /// Text can be edited freely; the entity stays attached.
    Mutable,
    /// Text cannot change without the entity being removed as a whole.
    Immutable,
    /// Text is removed word by word.
    Segmented,
}

impl EntityMutability {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityMutability::Mutable => "MUTABLE",
            EntityMutability::Immutable => "IMMUTABLE",
            EntityMutability::Segmented => "SEGMENTED",
        }
    }
}

/// A single entity: type, mutability and data.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftEntityInstance {
    entity_type: String,
    mutability: EntityMutability,
    data: DataMap,
}

impl DraftEntityInstance {
    pub fn new(
        entity_type: impl Into<String>,
        mutability: EntityMutability,
        data: DataMap,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            mutability,
            data,
        }
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn mutability(&self) -> EntityMutability {
        self.mutability
    }

    pub fn data(&self) -> &DataMap {
        &self.data
    }

    /// Shallow merge: fields in `partial` replace or extend existing ones.
    pub fn merge_data(&self, partial: &DataMap) -> Self {
        let mut data = self.data.clone();
        for (key, value) in partial {
            data.insert(key.clone(), value.clone());
        }
        Self {
            data,
            ..self.clone()
        }
    }

    pub fn with_data(&self, data: DataMap) -> Self {
        Self {
            data,
            ..self.clone()
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    instances: HashMap<String, DraftEntityInstance>,
    counter: u64,
}

/// Registry of entities keyed by monotonically issued string keys.
#[derive(Debug)]
pub struct EntityStore {
    id: String,
    state: RefCell<StoreState>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            id: generate_uuid(),
            state: RefCell::new(StoreState::default()),
        }
    }

    /// Correlation id of this store, used in logs.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Creates an entity and returns its new key.
    pub fn create(
        &self,
        entity_type: &str,
        mutability: EntityMutability,
        data: Option<DataMap>,
    ) -> String {
        self.add(DraftEntityInstance::new(
            entity_type,
            mutability,
            data.unwrap_or_default(),
        ))
    }

    /// Stores `instance` under a new key.
    pub fn add(&self, instance: DraftEntityInstance) -> String {
        let mut state = self.state.borrow_mut();
        state.counter += 1;
        let key = state.counter.to_string();
        tracing::trace!(
            store = %self.id,
            %key,
            entity_type = instance.entity_type(),
            "created entity"
        );
        state.instances.insert(key.clone(), instance);
        key
    }

    /// Retrieves the entity for `key`.
    pub fn get(&self, key: &str) -> Result<DraftEntityInstance> {
        self.state
            .borrow()
            .instances
            .get(key)
            .cloned()
            .ok_or_else(|| DraftError::EntityNotFound(key.to_string()))
    }

    /// Shallow-merges `partial` into the data of `key`.
    pub fn merge_data(&self, key: &str, partial: &DataMap) -> Result<DraftEntityInstance> {
        let merged = self.get(key)?.merge_data(partial);
        self.state
            .borrow_mut()
            .instances
            .insert(key.to_string(), merged.clone());
        Ok(merged)
    }

    /// Replaces the data of `key` entirely.
    pub fn replace_data(&self, key: &str, data: DataMap) -> Result<DraftEntityInstance> {
        let replaced = self.get(key)?.with_data(data);
        self.state
            .borrow_mut()
            .instances
            .insert(key.to_string(), replaced.clone());
        Ok(replaced)
    }

    /// Key of the most recently created entity; `"0"` before any creation.
    pub fn last_created_entity_key(&self) -> String {
        self.state.borrow().counter.to_string()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every entity and restarts the key counter. Test hook.
    pub fn reset(&self) {
        tracing::debug!(store = %self.id, "resetting entity store");
        *self.state.borrow_mut() = StoreState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(pairs: &[(&str, serde_json::Value)]) -> DataMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_create_then_get() {
        let store = EntityStore::new();
        let key = store.create(
            "LINK",
            EntityMutability::Mutable,
            Some(data(&[("url", json!("https://example.com"))])),
        );
        let entity = store.get(&key).unwrap();
        assert_eq!(entity.entity_type(), "LINK");
        assert_eq!(entity.mutability(), EntityMutability::Mutable);
        assert_eq!(entity.data()["url"], json!("https://example.com"));
    }

    #[test]
    fn test_keys_strictly_increase() {
        let store = EntityStore::new();
        assert_eq!(store.last_created_entity_key(), "0");
        let a = store.create("A", EntityMutability::Immutable, None);
        let b = store.create("B", EntityMutability::Immutable, None);
        assert_eq!(a, "1");
        assert_eq!(b, "2");
        assert_eq!(store.last_created_entity_key(), "2");
    }

    #[test]
    fn test_unknown_key_is_error() {
        let store = EntityStore::new();
        let err = store.get("7").unwrap_err();
        assert!(matches!(err, DraftError::EntityNotFound(k) if k == "7"));
    }

    #[test]
    fn test_merge_data() {
        let store = EntityStore::new();
        let key = store.create(
            "IMAGE",
            EntityMutability::Immutable,
            Some(data(&[("src", json!("a.png")), ("alt", json!("a"))])),
        );
        let merged = store
            .merge_data(&key, &data(&[("alt", json!("b")), ("width", json!(10))]))
            .unwrap();
        assert_eq!(merged.data()["src"], json!("a.png"));
        assert_eq!(merged.data()["alt"], json!("b"));
        assert_eq!(merged.data()["width"], json!(10));
        assert_eq!(store.get(&key).unwrap(), merged);
    }

    #[test]
    fn test_replace_data() {
        let store = EntityStore::new();
        let key = store.create(
            "IMAGE",
            EntityMutability::Immutable,
            Some(data(&[("src", json!("a.png"))])),
        );
        let replaced = store
            .replace_data(&key, data(&[("alt", json!("x"))]))
            .unwrap();
        assert!(!replaced.data().contains_key("src"));
        assert!(store.replace_data("99", DataMap::new()).is_err());
    }

    #[test]
    fn test_reset_restarts_counter() {
        let store = EntityStore::new();
        store.create("A", EntityMutability::Mutable, None);
        store.reset();
        assert!(store.is_empty());
        assert_eq!(store.create("B", EntityMutability::Mutable, None), "1");
    }
}
