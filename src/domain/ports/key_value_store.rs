use serde_json::Value;

use crate::domain::errors::StoreError;

/// Generic persisted key-value contract
///
/// Values are JSON documents. The tracker reads and writes exactly one key;
/// no schema migration or transactional discipline is expected from
/// implementations.
pub trait KeyValueStore: Send + Sync {
    /// Read the document stored under `key`
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the document stored under `key`
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}
