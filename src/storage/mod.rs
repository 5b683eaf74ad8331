//! Storage layer: string key-value persistence.
//!
//! All application state is stored as UTF-8 JSON text under a handful of
//! well-known keys, with the whole value replaced on every write. The
//! [`KeyValueStore`] trait abstracts the backend; [`MemoryStore`] keeps
//! values in process and [`FileStore`] keeps one file per key.

pub mod file;
pub mod memory;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::config::ReviewConfig;
use crate::error::ReviewError;

/// Key holding the JSON array of campaigns.
pub const CAMPAIGNS_KEY: &str = "email-campaigns";

/// Key holding the JSON array of client accounts.
pub const CLIENTS_KEY: &str = "email-clients";

/// Key holding the logged-in user; absent means logged out.
pub const SESSION_KEY: &str = "user";

/// Key holding the `light`/`dark` theme preference.
pub const THEME_KEY: &str = "color-theme";

/// Backend for string key-value persistence.
///
/// Implementations must be shareable across views (`Send + Sync`). A
/// missing key is `Ok(None)`, never an error.
pub trait KeyValueStore: std::fmt::Debug + Send + Sync {
    /// Returns the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Storage`] if the backend is unavailable.
    fn get(&self, key: &str) -> Result<Option<String>, ReviewError>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Storage`] if the value could not be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), ReviewError>;

    /// Removes `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Storage`] if the backend is unavailable.
    fn remove(&self, key: &str) -> Result<(), ReviewError>;
}

/// Opens the backend selected by `config`.
///
/// # Errors
///
/// Returns [`ReviewError::Storage`] if the storage directory cannot be
/// created.
pub fn open(config: &ReviewConfig) -> Result<Arc<dyn KeyValueStore>, ReviewError> {
    if config.persistence_enabled {
        let store = FileStore::open(&config.storage_dir)?;
        tracing::info!(dir = %config.storage_dir.display(), "using file storage");
        Ok(Arc::new(store))
    } else {
        tracing::info!("persistence disabled, using in-memory storage");
        Ok(Arc::new(MemoryStore::new()))
    }
}

/// Reads and decodes the JSON value stored under `key`.
///
/// # Errors
///
/// Returns [`ReviewError::Storage`] if the backend fails, or
/// [`ReviewError::Serialization`] if the stored text is not valid JSON for
/// `T`.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, ReviewError> {
    store
        .get(key)?
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(ReviewError::from)
}

/// Encodes `value` as JSON and stores it under `key`.
///
/// # Errors
///
/// Returns [`ReviewError::Serialization`] if encoding fails, or
/// [`ReviewError::Storage`] if the backend rejects the write.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), ReviewError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
