use std::collections::HashMap;

use super::{check_capacity, Namespace, Persistence, DEFAULT_CAPACITY_BYTES};
use crate::error::StorageError;

/// In-process snapshot store, used by tests and throwaway sessions.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    values: HashMap<Namespace, String>,
    backups: HashMap<Namespace, String>,
    capacity_bytes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY_BYTES)
    }

    pub fn with_capacity(capacity_bytes: usize) -> Self {
        Self {
            values: HashMap::new(),
            backups: HashMap::new(),
            capacity_bytes,
        }
    }

    /// Bytes currently held across all namespaces, backups included.
    pub fn used_bytes(&self) -> usize {
        self.values
            .values()
            .chain(self.backups.values())
            .map(String::len)
            .sum()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Persistence for MemoryStorage {
    fn load(&self, namespace: Namespace) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(&namespace).cloned())
    }

    fn save(&mut self, namespace: Namespace, snapshot: &str) -> Result<(), StorageError> {
        let others: usize = self
            .values
            .iter()
            .filter(|(ns, _)| **ns != namespace)
            .map(|(_, v)| v.len())
            .sum::<usize>()
            + self.backups.values().map(String::len).sum::<usize>();
        check_capacity(namespace, others, snapshot.len(), self.capacity_bytes)?;
        self.values.insert(namespace, snapshot.to_string());
        Ok(())
    }

    fn save_backup(&mut self, namespace: Namespace, raw: &str) -> Result<(), StorageError> {
        self.backups.insert(namespace, raw.to_string());
        Ok(())
    }

    fn load_backup(&self, namespace: Namespace) -> Result<Option<String>, StorageError> {
        Ok(self.backups.get(&namespace).cloned())
    }
}
