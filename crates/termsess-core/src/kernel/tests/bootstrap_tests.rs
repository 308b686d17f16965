use std::fs;

use tempfile::tempdir;

use crate::kernel::bootstrap::{open_store_at, Application};
use crate::kernel::constants::{SCHEMA_VERSION, SCHEMA_VERSION_KEY};
use crate::kernel::error::{Error, Result};
use crate::session::path::SessionPath;
use crate::storage::config::{EngineConfig, StoreKind};
use crate::storage::local::FileStore;
use crate::storage::provider::SettingsStore;
use crate::storage::value::StoredValue;

// Helper function to set up a temporary directory for testing
fn setup_test_env() -> tempfile::TempDir {
    tempdir().expect("Failed to create temporary directory")
}

#[test]
fn test_application_creates_store_root() -> Result<()> {
    let temp_dir = setup_test_env();
    let mut config = EngineConfig::default();
    config.root = temp_dir.path().join("nested").join("sessions");

    let app = Application::new(config)?;
    assert!(temp_dir.path().join("nested").join("sessions").is_dir());
    assert_eq!(app.manager().store().name(), "files");
    assert_eq!(app.migration_report().map(|r| r.checked), Some(0));
    Ok(())
}

#[test]
fn test_unusable_root_is_fatal() {
    let temp_dir = setup_test_env();
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, "not a directory").expect("write blocker");

    let mut config = EngineConfig::default();
    config.root = blocker.join("sessions");
    let result = Application::new(config);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_memory_store_without_migration() -> Result<()> {
    let mut config = EngineConfig::default();
    config.store = StoreKind::Memory;
    config.migrate_on_start = false;

    let app = Application::new(config)?;
    assert_eq!(app.manager().store().name(), "memory");
    assert!(app.migration_report().is_none());
    Ok(())
}

#[test]
fn test_platform_overrides_reach_loads() -> Result<()> {
    let mut config = EngineConfig::default();
    config.store = StoreKind::Memory;
    config
        .platform_defaults
        .insert("TermWidth".into(), StoredValue::Int(132));

    let app = Application::new(config)?;
    let conf = app.manager().load(&SessionPath::parse("Fresh")?)?;
    assert_eq!(conf.get_int("TermWidth"), Some(132));
    Ok(())
}

#[test]
fn test_start_up_migration_upgrades_old_records() -> Result<()> {
    let temp_dir = setup_test_env();
    let root = temp_dir.path().join("sessions");
    let store = FileStore::open(root.clone())?;
    let mut handle = store.open_write("Old")?;
    handle.write_int(SCHEMA_VERSION_KEY, SCHEMA_VERSION - 1);
    handle.close()?;

    let mut config = EngineConfig::default();
    config.root = root;
    let app = Application::new(config)?;

    let report = app.migration_report().expect("migration ran");
    assert_eq!(report.upgraded, vec!["Old"]);
    let read = store.open_read("Old")?;
    assert_eq!(read.read_int(SCHEMA_VERSION_KEY, 0), SCHEMA_VERSION);
    Ok(())
}

#[test]
fn test_from_config_file() -> Result<()> {
    let temp_dir = setup_test_env();
    let config_path = temp_dir.path().join("termsess.json");
    let mut config = EngineConfig::default();
    config.store = StoreKind::Document;
    config.root = temp_dir.path().join("all-sessions.json");
    config.save(&config_path)?;

    let app = Application::from_config_file(&config_path)?;
    assert_eq!(app.manager().store().name(), "document");
    assert_eq!(app.config(), &config);
    Ok(())
}

#[test]
fn test_open_store_at_picks_backend() -> Result<()> {
    let temp_dir = setup_test_env();
    assert_eq!(open_store_at(&temp_dir.path().join("dir"))?.name(), "files");
    assert_eq!(open_store_at(&temp_dir.path().join("doc.json"))?.name(), "document");
    Ok(())
}
