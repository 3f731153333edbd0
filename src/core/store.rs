//! Local key-value persistence
//!
//! Client state (favorites, collections, preferences, recent searches) lives in
//! a string key-value store injected by the caller. Values are independent of
//! each other, writes are last-write-wins, and a value that cannot be decoded is
//! treated as absent.

use super::error::StorageError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;

/// Storage keys used by the site
pub mod keys {
    pub const FAVORITES: &str = "opensoftware_favorites";
    pub const COLLECTIONS: &str = "opensoftware_collections";
    pub const ACCESSIBILITY: &str = "opensoftware_accessibility";
    pub const RECENT_SEARCHES: &str = "recentSearches";
    pub const LANGUAGE: &str = "preferred-language";
    pub const THEME: &str = "theme";
}

/// A string key-value store
///
/// Implement this trait to plug a different backend under the persisted
/// client state.
pub trait KeyValueStore: Send + Sync {
    /// Read a raw value
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a raw value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value; deleting a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// A typed JSON value stored under one key
///
/// `load` never fails on bad data: a missing key or a value that does not
/// decode as `T` yields `T::default()`; the latter is logged.
pub struct JsonSlot<T> {
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonSlot<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Read and decode the value, falling back to the default
    pub fn load(&self, store: &dyn KeyValueStore) -> Result<T, StorageError> {
        self.load_with(store, T::default)
    }

    /// Read and decode the value, falling back to `fallback()`
    pub fn load_with(
        &self,
        store: &dyn KeyValueStore,
        fallback: impl FnOnce() -> T,
    ) -> Result<T, StorageError> {
        let Some(raw) = store.get(self.key)? else {
            return Ok(fallback());
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "discarding unreadable stored value");
                Ok(fallback())
            }
        }
    }

    /// Encode and write the value
    pub fn save(&self, store: &dyn KeyValueStore, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|e| StorageError::Encode {
            key: self.key.to_string(),
            message: e.to_string(),
        })?;
        store.set(self.key, &raw)
    }

    pub fn clear(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        store.remove(self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryKeyValueStore;

    const NUMBERS: JsonSlot<Vec<u32>> = JsonSlot::new("numbers");

    #[test]
    fn test_missing_value_loads_default() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(NUMBERS.load(&store).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn test_save_then_load() {
        let store = InMemoryKeyValueStore::new();
        NUMBERS.save(&store, &vec![3, 1, 2]).unwrap();

        assert_eq!(store.get("numbers").unwrap().as_deref(), Some("[3,1,2]"));
        assert_eq!(NUMBERS.load(&store).unwrap(), vec![3, 1, 2]);
    }

    #[test]
    fn test_corrupt_value_falls_back() {
        let store = InMemoryKeyValueStore::new();
        store.set("numbers", "{not json").unwrap();

        assert_eq!(NUMBERS.load(&store).unwrap(), Vec::<u32>::new());
        assert_eq!(
            NUMBERS.load_with(&store, || vec![7]).unwrap(),
            vec![7]
        );
    }

    #[test]
    fn test_clear_removes_key() {
        let store = InMemoryKeyValueStore::new();
        NUMBERS.save(&store, &vec![1]).unwrap();
        NUMBERS.clear(&store).unwrap();
        assert!(store.get("numbers").unwrap().is_none());
    }
}
