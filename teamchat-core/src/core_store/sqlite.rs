//! SQLite storage backend
//!
//! A single `kv` table holds every record: `key TEXT PRIMARY KEY,
//! value TEXT`. Multi-key writes run inside one transaction.

use super::errors::{StoreError, StoreResult};
use super::KvBackend;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use std::path::Path;

/// Durable single-file store
pub struct SqliteBackend {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteBackend {
    /// Open (or create) the database file at `path`
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Storage(format!("Failed to create data dir: {}", e)))?;
        }

        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::new(manager)
            .map_err(|e| StoreError::Storage(format!("Failed to create pool: {}", e)))?;

        Self::with_pool(pool)
    }

    /// In-memory database (tests). A shared in-memory SQLite database needs
    /// every statement on the same connection, so the pool is capped at one.
    pub fn memory() -> StoreResult<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| StoreError::Storage(format!("Failed to create pool: {}", e)))?;

        Self::with_pool(pool)
    }

    fn with_pool(pool: Pool<SqliteConnectionManager>) -> StoreResult<Self> {
        let backend = SqliteBackend { pool };
        backend.migrate()?;
        Ok(backend)
    }

    fn conn(&self) -> StoreResult<PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| StoreError::Storage(format!("Failed to get connection: {}", e)))
    }

    fn migrate(&self) -> StoreResult<()> {
        self.conn()?
            .execute(
                "CREATE TABLE IF NOT EXISTS kv (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                )",
                [],
            )
            .map_err(storage_err)?;
        Ok(())
    }
}

fn storage_err(e: rusqlite::Error) -> StoreError {
    StoreError::Storage(e.to_string())
}

impl KvBackend for SqliteBackend {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        self.conn()?
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(storage_err)
    }

    fn put_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn()?
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(storage_err)?;
        Ok(())
    }

    fn put_many_raw(&self, batch: &[(String, String)]) -> StoreResult<()> {
        let conn = self.conn()?;
        let tx = conn.unchecked_transaction().map_err(storage_err)?;
        for (key, value) in batch {
            tx.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(storage_err)?;
        }
        tx.commit().map_err(storage_err)?;
        Ok(())
    }

    fn remove_raw(&self, key: &str) -> StoreResult<()> {
        self.conn()?
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(storage_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_upsert_and_read_back() {
        let backend = SqliteBackend::memory().unwrap();

        backend.put_raw("users", "[]").unwrap();
        assert_eq!(backend.get_raw("users").unwrap().as_deref(), Some("[]"));

        backend.put_raw("users", "[{}]").unwrap();
        assert_eq!(backend.get_raw("users").unwrap().as_deref(), Some("[{}]"));
    }

    #[test]
    fn test_missing_key_is_none() {
        let backend = SqliteBackend::memory().unwrap();
        assert_eq!(backend.get_raw("absent").unwrap(), None);
    }

    #[test]
    fn test_put_many_commits_every_entry() {
        let backend = SqliteBackend::memory().unwrap();
        backend
            .put_many_raw(&[
                ("groups".to_string(), "[1]".to_string()),
                ("messages".to_string(), "[2]".to_string()),
            ])
            .unwrap();

        assert_eq!(backend.get_raw("groups").unwrap().as_deref(), Some("[1]"));
        assert_eq!(
            backend.get_raw("messages").unwrap().as_deref(),
            Some("[2]")
        );
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("teamchat.db");

        {
            let backend = SqliteBackend::open(&db_path).unwrap();
            backend.put_raw("users", "[\"persisted\"]").unwrap();
        }

        let backend = SqliteBackend::open(&db_path).unwrap();
        assert_eq!(
            backend.get_raw("users").unwrap().as_deref(),
            Some("[\"persisted\"]")
        );
    }

    #[test]
    fn test_remove_deletes_row() {
        let backend = SqliteBackend::memory().unwrap();
        backend.put_raw("k", "v").unwrap();
        backend.remove_raw("k").unwrap();
        assert_eq!(backend.get_raw("k").unwrap(), None);
    }
}
