//! Persistence of folder and record snapshots.
//!
//! Snapshots are opaque JSON strings stored under one of two namespaces.
//! Every backend enforces a byte quota across all namespaces and reports
//! [`StorageError::CapacityExceeded`] when a save would go over it.

mod config;
pub mod database;
mod memory;

pub use config::{CalendarConfig, Config, StorageConfig, TimerConfig};
pub use database::Database;
pub use memory::MemoryStorage;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Default quota, in bytes, shared by all namespaces.
pub const DEFAULT_CAPACITY_BYTES: usize = 5 * 1024 * 1024;

/// Logical key a snapshot is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Folders,
    Records,
}

impl Namespace {
    pub const ALL: [Namespace; 2] = [Namespace::Folders, Namespace::Records];

    pub fn key(&self) -> &'static str {
        match self {
            Namespace::Folders => "folders",
            Namespace::Records => "records",
        }
    }

    /// Key holding a snapshot that could not be read back.
    pub fn backup_key(&self) -> &'static str {
        match self {
            Namespace::Folders => "folders.unreadable",
            Namespace::Records => "records.unreadable",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Key-value snapshot store.
pub trait Persistence {
    /// The last saved snapshot, or `None` if nothing was ever saved.
    fn load(&self, namespace: Namespace) -> Result<Option<String>, StorageError>;

    /// Replace the snapshot. Fails without writing if the quota would be exceeded.
    fn save(&mut self, namespace: Namespace, snapshot: &str) -> Result<(), StorageError>;

    /// Set aside a snapshot that could not be read, replacing any earlier
    /// backup of the namespace. Not subject to the quota, since the bytes
    /// were already stored.
    fn save_backup(&mut self, namespace: Namespace, raw: &str) -> Result<(), StorageError>;

    fn load_backup(&self, namespace: Namespace) -> Result<Option<String>, StorageError>;
}

/// Check a pending write of `snapshot_len` bytes against `limit`, given the
/// bytes already held by the other namespaces.
pub(crate) fn check_capacity(
    namespace: Namespace,
    others_len: usize,
    snapshot_len: usize,
    limit: usize,
) -> Result<(), StorageError> {
    let needed = others_len.saturating_add(snapshot_len);
    if needed > limit {
        return Err(StorageError::CapacityExceeded {
            namespace,
            needed,
            limit,
        });
    }
    Ok(())
}

/// Returns the data directory.
///
/// `MUSCLELOG_DATA_DIR` wins if set. Otherwise `~/.config/musclelog/`, or
/// `~/.config/musclelog-dev/` when `MUSCLELOG_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("MUSCLELOG_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("MUSCLELOG_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("musclelog-dev")
            } else {
                base_dir.join("musclelog")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_keys_are_stable() {
        assert_eq!(Namespace::Folders.key(), "folders");
        assert_eq!(Namespace::Records.to_string(), "records");
        assert_eq!(Namespace::Records.backup_key(), "records.unreadable");
        assert_eq!(serde_json::to_string(&Namespace::Records).unwrap(), "\"records\"");
    }

    #[test]
    fn capacity_check_counts_other_namespaces() {
        assert!(check_capacity(Namespace::Records, 40, 60, 100).is_ok());
        let err = check_capacity(Namespace::Records, 41, 60, 100).unwrap_err();
        match err {
            StorageError::CapacityExceeded { needed, limit, .. } => {
                assert_eq!(needed, 101);
                assert_eq!(limit, 100);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
