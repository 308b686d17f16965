//! # termsess Core Kernel
//!
//! Crate-wide pieces: the compiled-in [`constants`], the [`Error`] type
//! every subsystem error folds into, and [`Application`], which turns an
//! [`EngineConfig`](crate::storage::EngineConfig) into a running
//! [`SessionManager`](crate::session::SessionManager).
pub mod bootstrap;
pub mod constants;
pub mod error;

pub use bootstrap::{open_store, open_store_at, Application};
pub use error::{Error, Result};

// Test module declaration
#[cfg(test)]
mod tests;
