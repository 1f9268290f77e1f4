//! Durable key-value storage for the chat state
//!
//! Everything the application persists goes through [`Store`]: JSON blobs
//! addressed by string keys (see [`keys`] for the layout). The backend is
//! pluggable, either an in-memory map for tests and demos or SQLite for
//! durable single-file storage.
//!
//! There is no concurrent-writer isolation: two processes sharing one
//! database can clobber each other's whole-collection writes. Accepted
//! limitation of this design.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

pub mod errors;
pub mod keys;
mod memory;
pub mod model;
mod sqlite;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

/// Raw string-keyed storage backend.
///
/// `put_many_raw` must persist all entries as one atomic write; callers
/// rely on it to keep multi-key mutations (like a group delete with its
/// message cascade) free of observable intermediate states.
pub trait KvBackend: Send + Sync {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>>;

    fn put_raw(&self, key: &str, value: &str) -> StoreResult<()>;

    fn put_many_raw(&self, entries: &[(String, String)]) -> StoreResult<()>;

    fn remove_raw(&self, key: &str) -> StoreResult<()>;
}

/// Typed facade over a [`KvBackend`]
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KvBackend>,
}

impl Store {
    /// Wrap an existing backend
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Store { backend }
    }

    /// Volatile in-memory store (tests, demos)
    pub fn memory() -> Self {
        Store::new(Arc::new(MemoryBackend::new()))
    }

    /// Durable SQLite-backed store at the given database path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Store::new(Arc::new(SqliteBackend::open(path)?)))
    }

    /// Serialize a value the way `put` would, for use with `put_many`
    pub fn encode<T: Serialize>(value: &T) -> StoreResult<String> {
        serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Read and deserialize the value under `key`, `None` when absent
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        match self.backend.get_raw(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StoreError::Deserialization(e.to_string())),
            None => Ok(None),
        }
    }

    /// Like `get`, but an absent key reads as `T::default()`
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> StoreResult<T> {
        Ok(self.get(key)?.unwrap_or_default())
    }

    /// Serialize and upsert `value` under `key`
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        self.backend.put_raw(key, &Self::encode(value)?)
    }

    /// Upsert several pre-encoded entries as one atomic write
    pub fn put_many(&self, entries: Vec<(String, String)>) -> StoreResult<()> {
        self.backend.put_many_raw(&entries)
    }

    /// Read the raw string under `key` without JSON decoding
    pub fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        self.backend.get_raw(key)
    }

    /// Write a raw string under `key` without JSON encoding
    pub fn put_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        self.backend.put_raw(key, value)
    }

    /// Delete `key`; deleting an absent key is a no-op
    pub fn remove(&self, key: &str) -> StoreResult<()> {
        self.backend.remove_raw(key)
    }
}
