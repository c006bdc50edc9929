//! In-process key-value store.
//!
//! For callers whose tracking need not outlive the process, such as the
//! test suites and the library examples.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use crate::domain::errors::StoreError;
use crate::domain::ports::KeyValueStore;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_missing_key() {
        let store = InMemoryStore::new();
        assert!(store.get("nothing").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_replaces_value() {
        let store = InMemoryStore::new();
        store.set("k", json!([1])).unwrap();
        store.set("k", json!([1, 2])).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!([1, 2])));
        assert_eq!(store.len(), 1);
    }
}
