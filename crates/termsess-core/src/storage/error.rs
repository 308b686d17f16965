//! # termsess Storage Errors
//!
//! Defines [`StoreError`], the error enum for the Store Interface and its
//! backends: missing collections, I/O failures with the operation and path
//! that failed, and document (de)serialization problems.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Settings collection not found: '{name}'")]
    NotFound { name: String },

    #[error("I/O error during operation '{operation}' on path '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization to '{format}' failed: {source}")]
    Serialization {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Deserialization from '{format}' failed: {source}")]
    Deserialization {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid collection name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Store lock poisoned during '{0}'")]
    Poisoned(&'static str),
}

// Helper for creating Io errors, ensuring path is always included.
impl StoreError {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        StoreError::Io {
            source,
            operation: operation.into(),
            path: path.into(),
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        StoreError::NotFound { name: name.into() }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
