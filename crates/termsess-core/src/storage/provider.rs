use std::collections::BTreeMap;
use std::fmt::Debug;
use std::mem;

use crate::storage::error::{StoreError, StoreResult};
use crate::storage::value::{Filename, FontSpec, StoredValue};

/// The flat key/value contents of one named settings collection
pub type Record = BTreeMap<String, StoredValue>;

/// Trait for backends that persist named settings collections
pub trait SettingsStore: Send + Sync + Debug {
    /// Get the name of this backend
    fn name(&self) -> &str;

    /// Open a collection for reading. Fails with [`StoreError::NotFound`]
    /// when the collection does not exist.
    fn open_read(&self, name: &str) -> StoreResult<ReadHandle>;

    /// Open (creating if needed) a collection for writing. Values not
    /// written through the handle keep their current contents.
    fn open_write(&self, name: &str) -> StoreResult<WriteHandle<'_>>;

    /// Replace the stored contents of a collection. Called by
    /// [`WriteHandle::close`]; not meant for direct use.
    fn commit(&self, name: &str, record: Record) -> StoreResult<()>;

    /// Delete a collection. Deleting a missing collection succeeds.
    fn delete(&self, name: &str) -> StoreResult<()>;

    /// Enumerate collection names. Every call starts a fresh pass.
    fn enumerate(&self) -> StoreResult<Enumeration>;

    /// Check if a collection exists
    fn exists(&self, name: &str) -> bool {
        self.open_read(name).is_ok()
    }
}

/// A snapshot of one collection opened for reading.
///
/// Reads never fail: a missing key yields the supplied default.
#[derive(Debug, Clone)]
pub struct ReadHandle {
    name: String,
    record: Record,
}

impl ReadHandle {
    pub fn new(name: impl Into<String>, record: Record) -> Self {
        Self {
            name: name.into(),
            record,
        }
    }

    /// Name of the collection this handle was opened on
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.record.keys().map(String::as_str)
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        self.record.get(key).and_then(StoredValue::as_int)
    }

    pub fn get_str(&self, key: &str) -> Option<String> {
        self.record.get(key).map(StoredValue::as_text)
    }

    pub fn get_filename(&self, key: &str) -> Option<Filename> {
        self.get_str(key).map(Filename::new)
    }

    /// A font is present when its name field is; the remaining parallel
    /// fields fall back to `default` individually.
    pub fn get_fontspec(&self, key: &str, default: &FontSpec) -> Option<FontSpec> {
        let name = self.get_str(&FontSpec::name_key(key))?;
        Some(FontSpec {
            name,
            height: self
                .get_int(&FontSpec::height_key(key))
                .unwrap_or(default.height),
            charset: self
                .get_int(&FontSpec::charset_key(key))
                .unwrap_or(default.charset),
            is_bold: self
                .get_int(&FontSpec::bold_key(key))
                .map(|v| v != 0)
                .unwrap_or(default.is_bold),
        })
    }

    pub fn read_int(&self, key: &str, default: i32) -> i32 {
        self.get_int(key).unwrap_or(default)
    }

    pub fn read_str(&self, key: &str, default: &str) -> String {
        self.get_str(key).unwrap_or_else(|| default.to_string())
    }

    pub fn read_filename(&self, key: &str, default: Filename) -> Filename {
        self.get_filename(key).unwrap_or(default)
    }

    pub fn read_fontspec(&self, key: &str, default: FontSpec) -> FontSpec {
        self.get_fontspec(key, &default).unwrap_or(default)
    }

    /// Release the handle
    pub fn close(self) {}
}

/// A collection opened for writing.
///
/// Writes are buffered and committed by [`WriteHandle::close`]. Dropping a
/// handle without closing it releases it and discards pending writes.
pub struct WriteHandle<'a> {
    store: &'a dyn SettingsStore,
    name: String,
    record: Record,
    dirty: bool,
    closed: bool,
}

impl<'a> WriteHandle<'a> {
    /// Start a write session seeded with the collection's current contents
    pub fn new(store: &'a dyn SettingsStore, name: impl Into<String>, existing: Record) -> Self {
        Self {
            store,
            name: name.into(),
            record: existing,
            dirty: false,
            closed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn write_int(&mut self, key: &str, value: i32) {
        self.put(key, StoredValue::Int(value));
    }

    pub fn write_str(&mut self, key: &str, value: &str) {
        self.put(key, StoredValue::Str(value.to_string()));
    }

    pub fn write_filename(&mut self, key: &str, value: &Filename) {
        self.put(key, StoredValue::Str(value.to_stored()));
    }

    pub fn write_fontspec(&mut self, key: &str, value: &FontSpec) {
        self.put(&FontSpec::name_key(key), StoredValue::Str(value.name.clone()));
        self.put(&FontSpec::height_key(key), StoredValue::Int(value.height));
        self.put(&FontSpec::charset_key(key), StoredValue::Int(value.charset));
        self.put(&FontSpec::bold_key(key), StoredValue::Int(i32::from(value.is_bold)));
    }

    pub fn remove(&mut self, key: &str) {
        if self.record.remove(key).is_some() {
            self.dirty = true;
        }
    }

    fn put(&mut self, key: &str, value: StoredValue) {
        self.record.insert(key.to_string(), value);
        self.dirty = true;
    }

    /// Release the handle without committing and return the buffered
    /// record, so it can be committed later as a whole
    pub fn into_record(mut self) -> Record {
        self.closed = true;
        mem::take(&mut self.record)
    }

    /// Commit the buffered writes and release the handle
    pub fn close(mut self) -> StoreResult<()> {
        self.closed = true;
        let record = mem::take(&mut self.record);
        self.store.commit(&self.name, record)
    }
}

impl Drop for WriteHandle<'_> {
    fn drop(&mut self) {
        if !self.closed && self.dirty {
            log::warn!(
                "Write handle for '{}' on store '{}' dropped without close; discarding pending writes",
                self.name,
                self.store.name()
            );
        }
    }
}

impl Debug for WriteHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteHandle")
            .field("store", &self.store.name())
            .field("name", &self.name)
            .field("pending", &self.record.len())
            .finish()
    }
}

/// Lazy pass over a NUL-separated, double-NUL-terminated name buffer
#[derive(Debug, Clone)]
pub struct Enumeration {
    buffer: String,
    pos: usize,
}

impl Enumeration {
    /// Build the buffer from a list of names. Names containing NUL or empty
    /// names cannot be represented and are skipped.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buffer = String::new();
        for name in names {
            let name = name.as_ref();
            if name.is_empty() || name.contains('\0') {
                log::warn!("Skipping unrepresentable collection name {:?}", name);
                continue;
            }
            buffer.push_str(name);
            buffer.push('\0');
        }
        buffer.push('\0');
        Self { buffer, pos: 0 }
    }

    /// The raw buffer
    pub fn as_buffer(&self) -> &str {
        &self.buffer
    }
}

impl Iterator for Enumeration {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let rest = self.buffer.get(self.pos..)?;
        let end = rest.find('\0').unwrap_or(rest.len());
        if end == 0 {
            self.pos = self.buffer.len();
            return None;
        }
        let name = rest[..end].to_string();
        self.pos += end + 1;
        Some(name)
    }
}

/// Reject names no backend can hold
pub fn validate_name(name: &str) -> StoreResult<()> {
    if name.is_empty() {
        return Err(StoreError::InvalidName {
            name: name.to_string(),
            reason: "name is empty".to_string(),
        });
    }
    if name.contains('\0') {
        return Err(StoreError::InvalidName {
            name: name.replace('\0', "\\0"),
            reason: "name contains NUL".to_string(),
        });
    }
    Ok(())
}
