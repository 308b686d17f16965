//! # termsess Sessions
//!
//! The session namespace and the CRUD orchestrator built on it.
//!
//! - [`SessionPath`]: validated `#`-delimited paths; a trailing `#` marks a
//!   group.
//! - [`namespace`]: the presentation order ([`sessioncmp`]), the sorted
//!   [`SessionList`] and prefix lookups used by group cascades.
//! - [`SessionManager`]: load, save, create, rename, move, copy, duplicate,
//!   delete, export, import and the schema migration sweep.
pub mod error;
pub mod manager;
pub mod namespace;
pub mod path;
pub mod templates;

/// Re-export key types
pub use error::SessionError;
pub use manager::{MigrationReport, SessionManager};
pub use namespace::{lower_bound_in_sesslist, prefix_run, sessioncmp, SessionList};
pub use path::SessionPath;

// Test module declaration
#[cfg(test)]
mod tests;
