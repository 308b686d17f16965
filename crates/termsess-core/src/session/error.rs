//! # termsess Session Errors
//!
//! Defines [`SessionError`], raised by the namespace and the CRUD
//! orchestrator. Collision and length errors are always raised before the
//! store is touched.
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid session path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("A session or group named '{path}' already exists")]
    NameCollision { path: String },

    #[error("Name '{name}' is longer than {limit} characters")]
    NameTooLong { name: String, limit: usize },

    #[error("No session or group named '{path}'")]
    NotFound { path: String },

    #[error("'{path}' is not a group")]
    NotAGroup { path: String },

    #[error("'{path}' is not a session")]
    NotASession { path: String },

    #[error("Cannot move group '{from}' into '{to}', which is inside it")]
    GroupIntoItself { from: String, to: String },

    #[error("Autocommand slot {slot} is out of range (limit {limit})")]
    SlotOutOfRange { slot: usize, limit: usize },
}

impl SessionError {
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        SessionError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn collision(path: impl Into<String>) -> Self {
        SessionError::NameCollision { path: path.into() }
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        SessionError::NotFound { path: path.into() }
    }
}
