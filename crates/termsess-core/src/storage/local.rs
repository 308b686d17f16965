use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::storage::error::{StoreError, StoreResult};
use crate::storage::naming::{escape_field, escape_name, unescape};
use crate::storage::provider::{
    validate_name, Enumeration, ReadHandle, Record, SettingsStore, WriteHandle,
};
use crate::storage::value::StoredValue;

/// Flat-file settings store: one file per collection inside a root directory.
///
/// Each line of a collection file is `key\value\`, with backslashes and
/// control characters in keys and values escaped as `%XX`.
#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root` without touching the filesystem
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create a store rooted at `root`, creating the directory if needed
    pub fn open(root: PathBuf) -> StoreResult<Self> {
        fs::create_dir_all(&root).map_err(|e| StoreError::io(e, "create_root", &root))?;
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the file holding a collection
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(escape_name(name))
    }

    fn fetch(&self, name: &str) -> StoreResult<Option<Record>> {
        let path = self.path_for(name);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(parse_record(&path, &contents))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(e, "read_record", path)),
        }
    }
}

impl SettingsStore for FileStore {
    fn name(&self) -> &str {
        "files"
    }

    fn open_read(&self, name: &str) -> StoreResult<ReadHandle> {
        let record = self.fetch(name)?.ok_or_else(|| StoreError::not_found(name))?;
        Ok(ReadHandle::new(name, record))
    }

    fn open_write(&self, name: &str) -> StoreResult<WriteHandle<'_>> {
        validate_name(name)?;
        let existing = self.fetch(name)?.unwrap_or_default();
        Ok(WriteHandle::new(self, name, existing))
    }

    fn commit(&self, name: &str, record: Record) -> StoreResult<()> {
        validate_name(name)?;
        let full_path = self.path_for(name);
        fs::create_dir_all(&self.root).map_err(|e| StoreError::io(e, "create_root", &self.root))?;

        // Create a named temporary file in the same directory as the target file
        let mut temp_file = NamedTempFile::new_in(&self.root)
            .map_err(|e| StoreError::io(e, "create_temp_file", &self.root))?;
        temp_file
            .write_all(render_record(&record).as_bytes())
            .map_err(|e| StoreError::io(e, "write_to_temp_file", temp_file.path()))?;

        // Persist the temporary file, atomically replacing the target file
        temp_file
            .persist(&full_path)
            .map_err(|e| StoreError::io(e.error, "persist_temp_file", &full_path))?;

        log::debug!("Wrote {} values to {}", record.len(), full_path.display());
        Ok(())
    }

    fn delete(&self, name: &str) -> StoreResult<()> {
        let full_path = self.path_for(name);
        match fs::remove_file(&full_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(e, "remove_file", full_path)),
        }
    }

    fn enumerate(&self) -> StoreResult<Enumeration> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Enumeration::from_names(Vec::<String>::new())),
            Err(e) => return Err(StoreError::io(e, "read_dir", &self.root)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(e, "read_dir_entry", &self.root))?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                log::warn!("Ignoring non UTF-8 file in {}", self.root.display());
                continue;
            };
            // Escaped names never start with '.', so this skips temp files too
            if !is_file || file_name.starts_with('.') {
                continue;
            }
            names.push(unescape(file_name));
        }
        names.sort();
        Ok(Enumeration::from_names(names))
    }

    fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }
}

impl fmt::Debug for FileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStore")
            .field("root", &self.root)
            .finish()
    }
}

fn render_record(record: &Record) -> String {
    let mut out = String::new();
    for (key, value) in record {
        out.push_str(&escape_field(key));
        out.push('\\');
        out.push_str(&escape_field(&value.as_text()));
        out.push_str("\\\n");
    }
    out
}

fn parse_record(path: &Path, contents: &str) -> Record {
    let mut record = Record::new();
    for (number, line) in contents.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let parsed = line
            .split_once('\\')
            .and_then(|(key, rest)| rest.strip_suffix('\\').map(|value| (key, value)));
        match parsed {
            Some((key, value)) => {
                record.insert(unescape(key), StoredValue::Str(unescape(value)));
            }
            None => log::warn!(
                "Skipping malformed line {} in {}",
                number + 1,
                path.display()
            ),
        }
    }
    record
}
