//! # Storage Layer
//!
//! A [`KeyValueStore`] holds whole string values under string keys, the way
//! browser local storage does. [`LocalEntryStorage`] is the storage adapter
//! that keeps the serialized entry list under one fixed key.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::Entry;

pub mod file;
pub mod memory;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;

/// Errors raised by stores and the entry storage adapter.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("storage key '{key}' cannot be used as a file name")]
    InvalidKey { key: String },
    /// The stored value exists but is not a well-formed entry list.
    #[error("stored value under '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
    #[error("failed to serialize entries: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StorageError {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StorageError::Corrupt { .. })
    }
}

/// String key-value persistence with whole-value reads and writes.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Load/save of the whole entry collection.
pub trait EntryStorage: Send + Sync {
    /// Returns the persisted collection, empty when nothing is stored.
    fn load(&self) -> Result<Vec<Entry>, StorageError>;
    /// Replaces the persisted collection.
    fn save(&self, entries: &[Entry]) -> Result<(), StorageError>;
}

/// Entry storage adapter over a key-value store.
#[derive(Debug, Clone)]
pub struct LocalEntryStorage<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> LocalEntryStorage<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The raw stored value, exactly as persisted.
    pub fn raw(&self) -> Result<Option<String>, StorageError> {
        self.store.get_item(&self.key)
    }

    /// Drops the stored collection entirely.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove_item(&self.key)?;
        info!(key = %self.key, "Cleared stored entries");
        Ok(())
    }
}

impl<S: KeyValueStore> EntryStorage for LocalEntryStorage<S> {
    fn load(&self) -> Result<Vec<Entry>, StorageError> {
        let Some(raw) = self.store.get_item(&self.key)? else {
            return Ok(Vec::new());
        };

        // Empty strings and `null` both read as "nothing stored".
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Option<Vec<Entry>>>(&raw) {
            Ok(entries) => {
                let entries = entries.unwrap_or_default();
                debug!(key = %self.key, count = entries.len(), "Loaded entries");
                Ok(entries)
            }
            Err(source) => {
                warn!(key = %self.key, error = %source, "Stored entry list is corrupt");
                Err(StorageError::Corrupt {
                    key: self.key.clone(),
                    source,
                })
            }
        }
    }

    fn save(&self, entries: &[Entry]) -> Result<(), StorageError> {
        let value = serde_json::to_string(entries).map_err(StorageError::Serialize)?;
        self.store.set_item(&self.key, &value)?;
        debug!(key = %self.key, count = entries.len(), "Saved entries");
        Ok(())
    }
}
