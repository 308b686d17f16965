use std::path::Path;
use std::sync::Arc;

use crate::kernel::constants;
use crate::kernel::error::{Error, Result};
use crate::session::manager::{MigrationReport, SessionManager};
use crate::settings::platform::StandardPlatform;
use crate::storage::config::{ConfigFormat, EngineConfig, StoreKind};
use crate::storage::document::DocumentStore;
use crate::storage::local::FileStore;
use crate::storage::memory::MemoryStore;
use crate::storage::provider::SettingsStore;

/// A running engine: the configured store, its platform defaults and the
/// session manager over them
#[derive(Debug)]
pub struct Application {
    config: EngineConfig,
    manager: SessionManager,
    migration: Option<MigrationReport>,
}

impl Application {
    /// Build the engine described by `config`.
    ///
    /// Failing to acquire the store root is fatal. When `migrate_on_start`
    /// is set the schema migration sweep runs before this returns.
    pub fn new(config: EngineConfig) -> Result<Self> {
        log::info!("Initializing {} v{}", constants::APP_NAME, constants::APP_VERSION);

        let store = open_store(&config)?;
        log::info!("Using {} store at {}", store.name(), config.root.display());

        let platform = Arc::new(StandardPlatform::with_overrides(
            config.platform_defaults.clone(),
        ));
        let manager = SessionManager::new(store, platform);

        let migration = if config.migrate_on_start {
            Some(manager.migrate_all()?)
        } else {
            None
        };

        Ok(Application {
            config,
            manager,
            migration,
        })
    }

    /// Load the configuration file at `path` (defaults if it is missing)
    /// and build the engine
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let config = EngineConfig::load(path)?;
        Self::new(config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn manager(&self) -> &SessionManager {
        &self.manager
    }

    /// Report of the start-up migration sweep, if one ran
    pub fn migration_report(&self) -> Option<&MigrationReport> {
        self.migration.as_ref()
    }
}

/// Open the primary store described by `config`
pub fn open_store(config: &EngineConfig) -> Result<Arc<dyn SettingsStore>> {
    let store: Arc<dyn SettingsStore> = match config.store {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::Files => Arc::new(
            FileStore::open(config.root.clone()).map_err(|e| root_error(&config.root, e))?,
        ),
        StoreKind::Document => Arc::new(
            DocumentStore::open(config.root.clone(), config.resolved_document_format())
                .map_err(|e| root_error(&config.root, e))?,
        ),
    };
    Ok(store)
}

/// Open a store at `path` for export or import: a document store when the
/// extension names a document format, a file store directory otherwise
pub fn open_store_at(path: &Path) -> Result<Arc<dyn SettingsStore>> {
    let store: Arc<dyn SettingsStore> = match ConfigFormat::from_path(path) {
        Some(format) => Arc::new(DocumentStore::open(path.to_path_buf(), format)?),
        None => Arc::new(FileStore::open(path.to_path_buf())?),
    };
    Ok(store)
}

fn root_error(root: &Path, source: impl std::fmt::Display) -> Error {
    log::error!("Cannot acquire store root {}: {}", root.display(), source);
    Error::Config(format!(
        "cannot acquire store root '{}': {}",
        root.display(),
        source
    ))
}
