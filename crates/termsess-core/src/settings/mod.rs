//! # termsess Settings
//!
//! The typed view of a stored session: [`Conf`] and its values, the default
//! chain (store, then [`PlatformDefaults`], then literal), the codecs for
//! composite and secret fields, and the [`schema`] that walks every
//! persisted field.
pub mod accessors;
pub mod codec;
pub mod conf;
pub mod defaults;
pub mod platform;
pub mod prefs;
pub mod schema;
pub mod secret;

/// Re-export key types
pub use accessors::{Emitter, MapEncoding, Resolver};
pub use conf::{Conf, ConfMap, ConfValue};
pub use defaults::{DefaultRegistry, SettingDiff};
pub use platform::{PlatformDefaults, StandardPlatform};
pub use prefs::PrefTable;
pub use secret::CodecError;

// Test module declaration
#[cfg(test)]
mod tests;
