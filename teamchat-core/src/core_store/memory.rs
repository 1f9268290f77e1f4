//! In-memory storage backend

use super::errors::{StoreError, StoreResult};
use super::KvBackend;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Helper to convert poison errors into StoreError
fn handle_poison<T>(_err: PoisonError<T>) -> StoreError {
    StoreError::Storage("Lock poisoned: a thread panicked while holding the lock".to_string())
}

/// Volatile map-backed store, the localStorage stand-in for tests and demos
#[derive(Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend::default()
    }
}

impl KvBackend for MemoryBackend {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.read().map_err(handle_poison)?;
        Ok(entries.get(key).cloned())
    }

    fn put_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(handle_poison)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn put_many_raw(&self, batch: &[(String, String)]) -> StoreResult<()> {
        // One lock acquisition covers the whole batch
        let mut entries = self.entries.write().map_err(handle_poison)?;
        for (key, value) in batch {
            entries.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn remove_raw(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(handle_poison)?;
        entries.remove(key);
        Ok(())
    }
}
