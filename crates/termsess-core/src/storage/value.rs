use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A single physical value inside a stored record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Int(i32),
    Str(String),
}

impl StoredValue {
    /// Interpret the value as an integer, parsing text if necessary
    pub fn as_int(&self) -> Option<i32> {
        match self {
            StoredValue::Int(v) => Some(*v),
            StoredValue::Str(s) => s.trim().parse().ok(),
        }
    }

    /// Interpret the value as text
    pub fn as_text(&self) -> String {
        match self {
            StoredValue::Int(v) => v.to_string(),
            StoredValue::Str(s) => s.clone(),
        }
    }
}

impl From<i32> for StoredValue {
    fn from(value: i32) -> Self {
        StoredValue::Int(value)
    }
}

impl From<&str> for StoredValue {
    fn from(value: &str) -> Self {
        StoredValue::Str(value.to_string())
    }
}

impl From<String> for StoredValue {
    fn from(value: String) -> Self {
        StoredValue::Str(value)
    }
}

/// A file path setting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filename {
    path: PathBuf,
}

impl Filename {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.path.as_os_str().is_empty()
    }

    /// The path as stored text
    pub fn to_stored(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl fmt::Display for Filename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// A font descriptor, persisted as four parallel fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSpec {
    pub name: String,
    pub height: i32,
    pub charset: i32,
    pub is_bold: bool,
}

impl FontSpec {
    pub fn new(name: impl Into<String>, height: i32, charset: i32, is_bold: bool) -> Self {
        Self {
            name: name.into(),
            height,
            charset,
            is_bold,
        }
    }

    pub fn name_key(key: &str) -> String {
        format!("{}Name", key)
    }

    pub fn height_key(key: &str) -> String {
        key.to_string()
    }

    pub fn charset_key(key: &str) -> String {
        format!("{}CharSet", key)
    }

    pub fn bold_key(key: &str) -> String {
        format!("{}IsBold", key)
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}pt", self.name, self.height)?;
        if self.is_bold {
            write!(f, ", bold")?;
        }
        Ok(())
    }
}
