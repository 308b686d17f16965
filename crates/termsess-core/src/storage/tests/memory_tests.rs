use crate::kernel::error::Result;
use crate::storage::error::StoreError;
use crate::storage::memory::MemoryStore;
use crate::storage::provider::SettingsStore;
use crate::storage::value::{Filename, FontSpec, StoredValue};

#[test]
fn test_write_and_read_values() -> Result<()> {
    let store = MemoryStore::new();

    let mut handle = store.open_write("Home")?;
    handle.write_int("PortNumber", 2222);
    handle.write_str("HostName", "example.org");
    handle.write_str("Empty", "");
    handle.close()?;

    let read = store.open_read("Home")?;
    assert_eq!(read.read_int("PortNumber", 22), 2222);
    assert_eq!(read.read_str("HostName", ""), "example.org");
    assert_eq!(read.read_str("Empty", "fallback"), "");
    assert_eq!(read.read_int("Missing", 7), 7, "Missing keys yield the default");
    Ok(())
}

#[test]
fn test_filename_reads_fall_back_to_default() -> Result<()> {
    let store = MemoryStore::new();

    let mut handle = store.open_write("Home")?;
    handle.write_filename("PublicKeyFile", &Filename::new("/keys/id_ed25519"));
    handle.close()?;

    let read = store.open_read("Home")?;
    assert_eq!(
        read.read_filename("PublicKeyFile", Filename::default()),
        Filename::new("/keys/id_ed25519")
    );
    assert_eq!(
        read.read_filename("LogFileName", Filename::new("termsess.log")),
        Filename::new("termsess.log")
    );
    Ok(())
}

#[test]
fn test_open_read_missing_is_not_found() {
    let store = MemoryStore::new();
    let result = store.open_read("nope");
    assert!(matches!(result, Err(StoreError::NotFound { .. })));
    assert!(!store.exists("nope"));
}

#[test]
fn test_open_write_merges_existing_values() -> Result<()> {
    let store = MemoryStore::new();

    let mut handle = store.open_write("s")?;
    handle.write_int("A", 1);
    handle.write_int("B", 2);
    handle.close()?;

    let mut handle = store.open_write("s")?;
    handle.write_int("B", 3);
    handle.close()?;

    let record = store.snapshot("s").expect("record should exist");
    assert_eq!(record.get("A"), Some(&StoredValue::Int(1)));
    assert_eq!(record.get("B"), Some(&StoredValue::Int(3)));
    Ok(())
}

#[test]
fn test_dropped_handle_discards_writes() -> Result<()> {
    let store = MemoryStore::new();
    {
        let mut handle = store.open_write("dropped")?;
        handle.write_int("A", 1);
    }
    assert!(!store.exists("dropped"));
    Ok(())
}

#[test]
fn test_fontspec_parallel_fields() -> Result<()> {
    let store = MemoryStore::new();
    let font = FontSpec::new("Fira Mono", 12, 0, true);

    let mut handle = store.open_write("f")?;
    handle.write_fontspec("Font", &font);
    handle.close()?;

    let record = store.snapshot("f").expect("record should exist");
    assert_eq!(record.get("FontName"), Some(&StoredValue::from("Fira Mono")));
    assert_eq!(record.get("Font"), Some(&StoredValue::Int(12)));
    assert_eq!(record.get("FontCharSet"), Some(&StoredValue::Int(0)));
    assert_eq!(record.get("FontIsBold"), Some(&StoredValue::Int(1)));

    let read = store.open_read("f")?;
    let default = FontSpec::new("Other", 10, 0, false);
    assert_eq!(read.read_fontspec("Font", default.clone()), font);
    assert_eq!(read.read_fontspec("BoldFont", default.clone()), default);
    Ok(())
}

#[test]
fn test_delete_and_enumerate() -> Result<()> {
    let store = MemoryStore::new();
    for name in ["b", "a", "c"] {
        let mut handle = store.open_write(name)?;
        handle.write_int("X", 1);
        handle.close()?;
    }
    store.delete("b")?;
    store.delete("never-existed")?;

    let names: Vec<String> = store.enumerate()?.collect();
    assert_eq!(names, vec!["a", "c"]);

    // Each call is a fresh pass
    assert_eq!(store.enumerate()?.count(), 2);
    assert_eq!(store.len(), 2);
    Ok(())
}

#[test]
fn test_enumeration_buffer_is_double_nul_terminated() -> Result<()> {
    let store = MemoryStore::new();
    store.commit("one", Default::default())?;
    store.commit("two", Default::default())?;

    let enumeration = store.enumerate()?;
    assert_eq!(enumeration.as_buffer(), "one\0two\0\0");
    Ok(())
}

#[test]
fn test_invalid_names_rejected() {
    let store = MemoryStore::new();
    assert!(matches!(
        store.open_write(""),
        Err(StoreError::InvalidName { .. })
    ));
    assert!(matches!(
        store.open_write("bad\0name"),
        Err(StoreError::InvalidName { .. })
    ));
}
