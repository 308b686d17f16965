use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::storage::config::ConfigFormat;
use crate::storage::error::{StoreError, StoreResult};
use crate::storage::provider::{
    validate_name, Enumeration, ReadHandle, Record, SettingsStore, WriteHandle,
};

/// On-disk shape of a document store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    sessions: BTreeMap<String, Record>,
}

/// Settings store keeping every collection in one serialized document.
///
/// The document is re-read on every operation and rewritten atomically on
/// every commit or delete.
pub struct DocumentStore {
    path: PathBuf,
    format: ConfigFormat,
    // Serializes read-modify-write cycles within this process
    guard: Mutex<()>,
}

impl DocumentStore {
    pub fn new(path: PathBuf, format: ConfigFormat) -> Self {
        Self {
            path,
            format,
            guard: Mutex::new(()),
        }
    }

    /// Create a store at `path`, picking the format from the extension
    pub fn at(path: PathBuf) -> StoreResult<Self> {
        let format = ConfigFormat::from_path(&path)
            .ok_or_else(|| StoreError::UnsupportedFormat(path.display().to_string()))?;
        Ok(Self::new(path, format))
    }

    /// Create a store and make sure its parent directory exists
    pub fn open(path: PathBuf, format: ConfigFormat) -> StoreResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(e, "create_root", parent))?;
        }
        Ok(Self::new(path, format))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ConfigFormat {
        self.format
    }

    fn read_document(&self) -> StoreResult<Document> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Document::default()),
            Ok(content) => self.format.deserialize(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::default()),
            Err(e) => Err(StoreError::io(e, "read_document", &self.path)),
        }
    }

    fn write_document(&self, document: &Document) -> StoreResult<()> {
        let content = self.format.serialize(document)?;
        let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };

        let mut temp_file = NamedTempFile::new_in(&parent)
            .map_err(|e| StoreError::io(e, "create_temp_file", &parent))?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| StoreError::io(e, "write_to_temp_file", temp_file.path()))?;
        temp_file
            .persist(&self.path)
            .map_err(|e| StoreError::io(e.error, "persist_temp_file", &self.path))?;
        Ok(())
    }

    fn update<F>(&self, operation: &'static str, change: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Document) -> bool,
    {
        let _guard = self.guard.lock().map_err(|_| StoreError::Poisoned(operation))?;
        let mut document = self.read_document()?;
        if change(&mut document) {
            self.write_document(&document)?;
        }
        Ok(())
    }
}

impl SettingsStore for DocumentStore {
    fn name(&self) -> &str {
        "document"
    }

    fn open_read(&self, name: &str) -> StoreResult<ReadHandle> {
        let mut document = self.read_document()?;
        document
            .sessions
            .remove(name)
            .map(|record| ReadHandle::new(name, record))
            .ok_or_else(|| StoreError::not_found(name))
    }

    fn open_write(&self, name: &str) -> StoreResult<WriteHandle<'_>> {
        validate_name(name)?;
        let existing = self.read_document()?.sessions.remove(name).unwrap_or_default();
        Ok(WriteHandle::new(self, name, existing))
    }

    fn commit(&self, name: &str, record: Record) -> StoreResult<()> {
        validate_name(name)?;
        self.update("commit", |document| {
            document.sessions.insert(name.to_string(), record);
            true
        })?;
        log::debug!("Committed '{}' to {}", name, self.path.display());
        Ok(())
    }

    fn delete(&self, name: &str) -> StoreResult<()> {
        self.update("delete", |document| document.sessions.remove(name).is_some())
    }

    fn enumerate(&self) -> StoreResult<Enumeration> {
        let document = self.read_document()?;
        Ok(Enumeration::from_names(document.sessions.keys()))
    }
}

impl fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("path", &self.path)
            .field("format", &self.format)
            .finish()
    }
}
