use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

use crate::storage::error::{StoreError, StoreResult};
use crate::storage::provider::{
    validate_name, Enumeration, ReadHandle, Record, SettingsStore, WriteHandle,
};

/// In-memory settings store
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored collections
    pub fn len(&self) -> usize {
        self.lock("len").map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of a stored collection, for inspection
    pub fn snapshot(&self, name: &str) -> Option<Record> {
        self.lock("snapshot").ok()?.get(name).cloned()
    }

    fn lock(&self, operation: &'static str) -> StoreResult<MutexGuard<'_, BTreeMap<String, Record>>> {
        self.records.lock().map_err(|_| StoreError::Poisoned(operation))
    }
}

impl SettingsStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn open_read(&self, name: &str) -> StoreResult<ReadHandle> {
        let records = self.lock("open_read")?;
        records
            .get(name)
            .map(|record| ReadHandle::new(name, record.clone()))
            .ok_or_else(|| StoreError::not_found(name))
    }

    fn open_write(&self, name: &str) -> StoreResult<WriteHandle<'_>> {
        validate_name(name)?;
        let existing = self.lock("open_write")?.get(name).cloned().unwrap_or_default();
        Ok(WriteHandle::new(self, name, existing))
    }

    fn commit(&self, name: &str, record: Record) -> StoreResult<()> {
        validate_name(name)?;
        self.lock("commit")?.insert(name.to_string(), record);
        Ok(())
    }

    fn delete(&self, name: &str) -> StoreResult<()> {
        self.lock("delete")?.remove(name);
        Ok(())
    }

    fn enumerate(&self) -> StoreResult<Enumeration> {
        let records = self.lock("enumerate")?;
        Ok(Enumeration::from_names(records.keys()))
    }

    fn exists(&self, name: &str) -> bool {
        self.lock("exists")
            .map(|records| records.contains_key(name))
            .unwrap_or(false)
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("collections", &self.len())
            .finish()
    }
}
