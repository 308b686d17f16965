pub mod kernel;
pub mod session;
pub mod settings;
pub mod storage;

// Re-export key public types for the binary and embedding applications
pub use kernel::error::Error as EngineError;
pub use kernel::{Application, Result};
pub use session::{SessionError, SessionList, SessionManager, SessionPath};
pub use settings::{Conf, ConfValue, DefaultRegistry, PlatformDefaults, StandardPlatform};
pub use storage::{
    DocumentStore, EngineConfig, FileStore, MemoryStore, SettingsStore, StoreError, StoreKind,
};
