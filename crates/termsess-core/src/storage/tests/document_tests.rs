use tempfile::tempdir;

use crate::kernel::error::Result;
use crate::storage::config::ConfigFormat;
use crate::storage::document::DocumentStore;
use crate::storage::error::StoreError;
use crate::storage::provider::SettingsStore;

fn roundtrip(format: ConfigFormat) -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join(format!("sessions.{}", format.extension()));
    let store = DocumentStore::open(path.clone(), format)?;

    let mut handle = store.open_write("Work#Server1")?;
    handle.write_int("PortNumber", 22);
    handle.write_str("HostName", "db.internal");
    handle.close()?;

    let mut handle = store.open_write("Home")?;
    handle.write_str("HostName", "home.lan");
    handle.close()?;

    // A second store over the same file sees the committed state
    let reopened = DocumentStore::at(path)?;
    assert_eq!(reopened.format(), format);
    let read = reopened.open_read("Work#Server1")?;
    assert_eq!(read.read_int("PortNumber", 0), 22);
    assert_eq!(read.read_str("HostName", ""), "db.internal");

    let names: Vec<String> = reopened.enumerate()?.collect();
    assert_eq!(names, vec!["Home", "Work#Server1"]);

    reopened.delete("Home")?;
    assert!(!store.exists("Home"));
    Ok(())
}

#[test]
fn test_json_document_roundtrip() -> Result<()> {
    roundtrip(ConfigFormat::Json)
}

#[cfg(feature = "yaml-config")]
#[test]
fn test_yaml_document_roundtrip() -> Result<()> {
    roundtrip(ConfigFormat::Yaml)
}

#[cfg(feature = "toml-config")]
#[test]
fn test_toml_document_roundtrip() -> Result<()> {
    roundtrip(ConfigFormat::Toml)
}

#[test]
fn test_missing_document_is_empty() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let store = DocumentStore::at(temp_dir.path().join("none.json"))?;
    assert_eq!(store.enumerate()?.count(), 0);
    assert!(matches!(store.open_read("x"), Err(StoreError::NotFound { .. })));
    Ok(())
}

#[test]
fn test_unknown_extension_rejected() {
    let result = DocumentStore::at("sessions.ini".into());
    assert!(matches!(result, Err(StoreError::UnsupportedFormat(_))));
}
