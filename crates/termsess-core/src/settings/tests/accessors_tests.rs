use std::collections::BTreeMap;

use crate::kernel::error::Result;
use crate::settings::accessors::{Emitter, MapEncoding, Resolver};
use crate::settings::conf::{ConfMap, ConfValue};
use crate::settings::defaults::DefaultRegistry;
use crate::settings::platform::{PlatformDefaults, StandardPlatform};
use crate::settings::prefs::CIPHERS;
use crate::storage::memory::MemoryStore;
use crate::storage::provider::SettingsStore;
use crate::storage::value::{Filename, FontSpec, StoredValue};

fn platform_with(entries: &[(&str, StoredValue)]) -> StandardPlatform {
    let overrides: BTreeMap<String, StoredValue> = entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    StandardPlatform::with_overrides(overrides)
}

#[test]
fn test_fallback_chain_order() -> Result<()> {
    let store = MemoryStore::new();
    let mut handle = store.open_write("s")?;
    handle.write_int("Stored", 1);
    handle.close()?;

    let platform = platform_with(&[
        ("Stored", StoredValue::Int(2)),
        ("Platform", StoredValue::Int(2)),
    ]);
    let read = store.open_read("s")?;
    let resolver = Resolver::new(Some(&read), &platform);

    assert_eq!(resolver.int("Stored", 3), 1, "Stored value wins");
    assert_eq!(resolver.int("Platform", 3), 2, "Platform default is next");
    assert_eq!(resolver.int("Literal", 3), 3, "Literal is the last resort");
    Ok(())
}

#[test]
fn test_missing_collection_resolves_defaults() {
    let platform = StandardPlatform::new();
    let resolver = Resolver::new(None, &platform);
    assert_eq!(resolver.string("HostName", "fallback"), "fallback");
    assert_eq!(resolver.filename("LogFileName"), Filename::new("termsess.log"));
    assert_eq!(resolver.fontspec("BoldFont"), platform.fontspec("BoldFont"));
    assert!(resolver.fontspec("BoldFont").is_bold);
}

#[test]
fn test_capture_records_literal_defaults_once() -> Result<()> {
    let store = MemoryStore::new();
    let mut handle = store.open_write("s")?;
    handle.write_int("PortNumber", 2222);
    handle.close()?;

    let registry = DefaultRegistry::new();
    assert!(registry.begin_capture());
    let platform = StandardPlatform::new();
    let read = store.open_read("s")?;
    let resolver = Resolver::new(Some(&read), &platform).capturing(&registry);

    assert_eq!(resolver.int("PortNumber", 22), 2222);
    assert_eq!(resolver.int("PortNumber", 23), 2222);
    assert_eq!(resolver.raw_int("Unrecorded", 5), 5);
    registry.seal();

    assert_eq!(registry.get("PortNumber"), Some(ConfValue::Int(22)));
    assert_eq!(registry.get("Unrecorded"), None);
    Ok(())
}

#[test]
fn test_indexed_keys() -> Result<()> {
    let store = MemoryStore::new();
    let mut handle = store.open_write("s")?;
    {
        let mut emitter = Emitter::new(&mut handle);
        emitter.int_indexed("Colour", 3, 0x123456);
        emitter.string_indexed("Autocommand", 0, "ls");
    }
    handle.close()?;

    let record = store.snapshot("s").expect("record");
    assert_eq!(record.get("Colour3"), Some(&StoredValue::Int(0x123456)));

    let platform = StandardPlatform::new();
    let read = store.open_read("s")?;
    let resolver = Resolver::new(Some(&read), &platform);
    assert_eq!(resolver.int_indexed("Colour", 3, 0), 0x123456);
    assert_eq!(resolver.string_indexed("Autocommand", 0, ""), "ls");
    assert_eq!(resolver.int_indexed("Colour", 4, 9), 9);
    Ok(())
}

#[test]
fn test_composite_values_roundtrip() -> Result<()> {
    let store = MemoryStore::new();
    let mut env = ConfMap::new();
    env.insert("LANG".into(), "C.UTF-8".into());
    env.insert("A,B".into(), "x=y".into());
    let font = FontSpec::new("Iosevka", 14, 0, false);
    let prefs = CIPHERS.parse("arcfour,aes");

    let mut handle = store.open_write("s")?;
    {
        let mut emitter = Emitter::new(&mut handle);
        emitter.map("Environment", MapEncoding::VALUES, &env);
        emitter.fontspec("Font", &font);
        emitter.prefs(&CIPHERS, &prefs);
        emitter.filename("PublicKeyFile", &Filename::new("/home/u/.ssh/id"));
        emitter.string("Empty", "");
    }
    handle.close()?;

    let platform = StandardPlatform::new();
    let read = store.open_read("s")?;
    let resolver = Resolver::new(Some(&read), &platform);
    assert_eq!(resolver.map("Environment", MapEncoding::VALUES, ""), env);
    assert_eq!(resolver.fontspec("Font"), font);
    assert_eq!(resolver.prefs(&CIPHERS), prefs);
    assert_eq!(resolver.filename("PublicKeyFile"), Filename::new("/home/u/.ssh/id"));
    assert_eq!(resolver.string("Empty", "default"), "");
    Ok(())
}

#[test]
fn test_platform_font_override() {
    let platform = platform_with(&[
        ("FontName", StoredValue::from("Hack")),
        ("Font", StoredValue::Int(13)),
    ]);
    let font = platform.fontspec("Font");
    assert_eq!(font.name, "Hack");
    assert_eq!(font.height, 13);
    assert!(!font.is_bold);
}
