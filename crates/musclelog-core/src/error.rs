//! Core error types for musclelog-core.
//!
//! This module defines the error hierarchy using thiserror. None of these
//! are fatal to the application: the training log catches storage failures
//! and turns them into notices, and invalid user input is reported back
//! without touching in-memory state.

use std::path::PathBuf;
use thiserror::Error;

use crate::storage::Namespace;

/// Core error type for musclelog-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Snapshot does not fit in the remaining storage quota
    #[error("Storage capacity exceeded while saving '{namespace}': {needed} bytes needed, limit is {limit} bytes")]
    CapacityExceeded {
        namespace: Namespace,
        needed: usize,
        limit: usize,
    },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

impl StorageError {
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, StorageError::CapacityExceeded { .. })
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Date key is not a real `YYYY-MM-DD` calendar date
    #[error("Invalid date key '{0}': expected YYYY-MM-DD")]
    InvalidDateKey(String),

    /// Unknown body part name
    #[error("Unknown body part '{0}'")]
    UnknownBodyPart(String),

    /// A required text field was blank
    #[error("'{field}' must not be empty")]
    Blank { field: &'static str },

    /// Referenced folder or item does not exist
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_error_mentions_namespace_and_sizes() {
        let err = StorageError::CapacityExceeded {
            namespace: Namespace::Folders,
            needed: 120,
            limit: 100,
        };
        let msg = err.to_string();
        assert!(msg.contains("folders"));
        assert!(msg.contains("120"));
        assert!(err.is_capacity_exceeded());
    }

    #[test]
    fn storage_error_converts_into_core_error() {
        let core: CoreError = StorageError::Locked.into();
        assert!(matches!(core, CoreError::Storage(StorageError::Locked)));
    }
}
