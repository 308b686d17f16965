//! # termsess Storage
//!
//! The Store Interface and its backends. A store holds named, flat
//! key/value collections; everything above this layer (typed accessors,
//! namespace, orchestrator) talks only to the [`SettingsStore`] trait.
//!
//! Backends:
//! - [`MemoryStore`]: in-memory buffer
//! - [`FileStore`]: one flat file per collection
//! - [`DocumentStore`]: every collection in one JSON/YAML/TOML document
pub mod config;
pub mod document;
pub mod error;
pub mod local;
pub mod memory;
pub mod naming;
pub mod provider;
pub mod value;

/// Re-export key types
pub use config::{ConfigFormat, EngineConfig, StoreKind};
pub use document::DocumentStore;
pub use error::{StoreError, StoreResult};
pub use local::FileStore;
pub use memory::MemoryStore;
pub use provider::{Enumeration, ReadHandle, Record, SettingsStore, WriteHandle};
pub use value::{Filename, FontSpec, StoredValue};

// Test module declaration
#[cfg(test)]
mod tests;
