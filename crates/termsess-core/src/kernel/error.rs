//! # termsess Core Errors
//!
//! Defines the crate-wide [`Error`] type.
//!
//! Each subsystem owns its own error enum ([`StoreError`], [`SessionError`],
//! [`CodecError`]); this module folds them into one type so callers of the
//! engine can propagate any failure with `?`.
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::session::error::SessionError;
use crate::settings::secret::CodecError;
use crate::storage::error::StoreError;

/// Error type for every fallible engine operation
#[derive(Debug, ThisError)]
pub enum Error {
    /// Backing store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Namespace or orchestration failure
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Secret field encoding failure
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Engine configuration could not be used
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl Error {
    /// True when the error reports a name collision on rename/move/duplicate
    pub fn is_name_collision(&self) -> bool {
        matches!(self, Error::Session(SessionError::NameCollision { .. }))
    }

    /// True when the error reports that a session or collection is absent
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Session(SessionError::NotFound { .. }) | Error::Store(StoreError::NotFound { .. })
        )
    }
}
