//! In-memory implementation of KeyValueStore for testing and development

use crate::core::error::StorageError;
use crate::core::store::KeyValueStore;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory key-value store
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// clones share the same map.
#[derive(Clone, Debug)]
pub struct InMemoryKeyValueStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            values: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.read().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self
            .values
            .read()
            .map_err(|e| StorageError::LockPoisoned {
                message: format!("Failed to acquire read lock: {}", e),
            })?;

        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self
            .values
            .write()
            .map_err(|e| StorageError::LockPoisoned {
                message: format!("Failed to acquire write lock: {}", e),
            })?;

        values.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self
            .values
            .write()
            .map_err(|e| StorageError::LockPoisoned {
                message: format!("Failed to acquire write lock: {}", e),
            })?;

        values.remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let store = InMemoryKeyValueStore::new();
        store.set("theme", "dark").unwrap();

        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_last_write_wins() {
        let store = InMemoryKeyValueStore::new();
        store.set("theme", "dark").unwrap();
        store.set("theme", "light").unwrap();

        assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let store = InMemoryKeyValueStore::new();
        store.remove("nothing").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let store = InMemoryKeyValueStore::new();
        let other = store.clone();
        other.set("preferred-language", "es").unwrap();

        assert_eq!(
            store.get("preferred-language").unwrap().as_deref(),
            Some("es")
        );
    }
}
