//! In-process storage backend.

use std::collections::HashMap;
use std::sync::RwLock;

use super::KeyValueStore;
use crate::error::ReviewError;

/// Key-value store held entirely in memory.
///
/// Used when persistence is disabled and throughout the tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> ReviewError {
    ReviewError::Storage("memory store lock poisoned".to_string())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ReviewError> {
        let values = self.values.read().map_err(poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ReviewError> {
        let mut values = self.values.write().map_err(poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ReviewError> {
        let mut values = self.values.write().map_err(poisoned)?;
        values.remove(key);
        Ok(())
    }
}

/// Store whose reads succeed but whose writes always fail, standing in
/// for a full disk or exhausted quota.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FullStore {
    pub(crate) inner: MemoryStore,
}

#[cfg(test)]
impl KeyValueStore for FullStore {
    fn get(&self, key: &str) -> Result<Option<String>, ReviewError> {
        self.inner.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), ReviewError> {
        Err(ReviewError::Storage("quota exceeded".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), ReviewError> {
        Err(ReviewError::Storage("quota exceeded".to_string()))
    }
}
