//! SQLite-backed snapshot storage.
//!
//! Provides persistent storage for:
//! - The folder list snapshot
//! - The day-record snapshot
//!
//! Both live in a single key-value table; the byte quota is checked before
//! every write.

use std::path::Path;

use rusqlite::{params, Connection};

use super::{check_capacity, data_dir, Namespace, Persistence};
use crate::error::StorageError;

/// SQLite database for snapshot storage.
pub struct Database {
    conn: Connection,
    capacity_bytes: usize,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/musclelog.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(capacity_bytes: usize) -> Result<Self, StorageError> {
        let path = data_dir()?.join("musclelog.db");
        Self::open_at(&path, capacity_bytes)
    }

    /// Open (or create) the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path, capacity_bytes: usize) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self {
            conn,
            capacity_bytes,
        };
        db.migrate()?;
        tracing::debug!(path = %path.display(), capacity_bytes, "database opened");
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn,
            capacity_bytes: super::DEFAULT_CAPACITY_BYTES,
        };
        db.migrate()?;
        Ok(db)
    }

    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    pub fn set_capacity_bytes(&mut self, capacity_bytes: usize) {
        self.capacity_bytes = capacity_bytes;
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Bytes stored under every key except `key`.
    fn bytes_excluding(&self, key: &str) -> Result<usize, rusqlite::Error> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(CAST(value AS BLOB))), 0) FROM kv WHERE key != ?1",
            params![key],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(total).unwrap_or(usize::MAX))
    }
}

impl Persistence for Database {
    fn load(&self, namespace: Namespace) -> Result<Option<String>, StorageError> {
        Ok(self.kv_get(namespace.key())?)
    }

    fn save(&mut self, namespace: Namespace, snapshot: &str) -> Result<(), StorageError> {
        let others = self.bytes_excluding(namespace.key())?;
        check_capacity(namespace, others, snapshot.len(), self.capacity_bytes)?;
        self.kv_set(namespace.key(), snapshot)?;
        tracing::debug!(%namespace, bytes = snapshot.len(), "snapshot saved");
        Ok(())
    }

    fn save_backup(&mut self, namespace: Namespace, raw: &str) -> Result<(), StorageError> {
        self.kv_set(namespace.backup_key(), raw)?;
        tracing::info!(%namespace, key = namespace.backup_key(), "unreadable snapshot set aside");
        Ok(())
    }

    fn load_backup(&self, namespace: Namespace) -> Result<Option<String>, StorageError> {
        Ok(self.kv_get(namespace.backup_key())?)
    }
}
