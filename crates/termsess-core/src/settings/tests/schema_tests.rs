use crate::kernel::constants::{SCHEMA_VERSION, SCHEMA_VERSION_KEY};
use crate::kernel::error::Result;
use crate::settings::accessors::{Emitter, Resolver};
use crate::settings::conf::{Conf, ConfValue};
use crate::settings::defaults::DefaultRegistry;
use crate::settings::platform::StandardPlatform;
use crate::settings::schema::{
    default_terminal_modes, kind_of, parse_value, read_conf, render_value, stored_keys,
    write_conf, SettingKind, REMOTE_QTITLE_ACTION, TERMINAL_MODES, TERMINAL_MODE_NAMES,
    TITLE_EMPTY, TITLE_REAL,
};
use crate::storage::memory::MemoryStore;
use crate::storage::provider::SettingsStore;
use crate::storage::value::{FontSpec, StoredValue};

fn load(store: &MemoryStore, name: &str) -> Result<Conf> {
    let platform = StandardPlatform::new();
    let handle = store.open_read(name).ok();
    let mut conf = Conf::new();
    read_conf(&Resolver::new(handle.as_ref(), &platform), &mut conf);
    Ok(conf)
}

fn save(store: &MemoryStore, name: &str, conf: &Conf) -> Result<()> {
    store.delete(name)?;
    let mut handle = store.open_write(name)?;
    write_conf(&mut Emitter::new(&mut handle), conf)?;
    handle.close()?;
    Ok(())
}

#[test]
fn test_load_missing_record_gives_defaults() -> Result<()> {
    let store = MemoryStore::new();
    let conf = load(&store, "absent")?;
    assert_eq!(conf.get_int("PortNumber"), Some(22));
    assert_eq!(conf.get_str("Protocol"), Some("ssh"));
    assert_eq!(conf.get_int("Colour0"), Some(0xBBBBBB));
    assert_eq!(conf.get_int("Wordness65"), Some(2));
    assert_eq!(conf.get_int("Wordness32"), Some(0));
    assert_eq!(conf.get_int("Wordness33"), Some(1));
    assert_eq!(conf.get_int(REMOTE_QTITLE_ACTION), Some(TITLE_EMPTY));
    Ok(())
}

#[test]
fn test_save_load_roundtrip() -> Result<()> {
    let store = MemoryStore::new();
    let mut conf = load(&store, "absent")?;
    conf.set_str("HostName", "example.org");
    conf.set_int("PortNumber", 2200);
    conf.set_font("Font", FontSpec::new("Hack", 11, 0, false));
    conf.map_mut("Environment").insert("TERM,X".into(), "a=b".into());
    conf.map_mut("PortForwardings").insert("L1080".into(), "D".into());
    conf.set_int(REMOTE_QTITLE_ACTION, TITLE_REAL);
    conf.set_str_indexed("Autocommand", 3, "uptime");
    conf.set_int_indexed("AutocommandHidden", 3, 1);

    save(&store, "s", &conf)?;
    let loaded = load(&store, "s")?;
    assert_eq!(loaded, conf);

    let record = store.snapshot("s").expect("record");
    assert_eq!(record.get(SCHEMA_VERSION_KEY), Some(&StoredValue::Int(SCHEMA_VERSION)));
    assert_eq!(record.get("PortForwardings"), Some(&StoredValue::from("D1080")));
    Ok(())
}

#[test]
fn test_unset_terminal_modes_load_as_full_default_map() -> Result<()> {
    let store = MemoryStore::new();
    let mut conf = Conf::new();
    conf.set_str("HostName", "h");
    save(&store, "s", &conf)?;

    let loaded = load(&store, "s")?;
    let modes = loaded.get_map(TERMINAL_MODES).expect("modes map");
    assert_eq!(modes.len(), TERMINAL_MODE_NAMES.len());
    assert!(modes.values().all(|v| v == "A"));
    assert_eq!(modes, &default_terminal_modes());
    Ok(())
}

#[test]
fn test_stored_terminal_modes_are_completed() -> Result<()> {
    let store = MemoryStore::new();
    let mut handle = store.open_write("s")?;
    handle.write_str(TERMINAL_MODES, "ERASE=^H,CUSTOM=1");
    handle.close()?;

    let loaded = load(&store, "s")?;
    let modes = loaded.get_map(TERMINAL_MODES).expect("modes map");
    assert_eq!(modes.get("ERASE").map(String::as_str), Some("^H"));
    assert_eq!(modes.get("CUSTOM").map(String::as_str), Some("1"));
    assert_eq!(modes.get("INTR").map(String::as_str), Some("A"));
    assert_eq!(modes.len(), TERMINAL_MODE_NAMES.len() + 1);
    Ok(())
}

#[test]
fn test_legacy_no_remote_qtitle_migration() -> Result<()> {
    let store = MemoryStore::new();
    let mut handle = store.open_write("legacy-off")?;
    handle.write_int("NoRemoteQTitle", 0);
    handle.close()?;
    let mut handle = store.open_write("legacy-on")?;
    handle.write_int("NoRemoteQTitle", 1);
    handle.close()?;
    let mut handle = store.open_write("modern")?;
    handle.write_int("NoRemoteQTitle", 0);
    handle.write_int(REMOTE_QTITLE_ACTION, 0);
    handle.close()?;

    assert_eq!(load(&store, "legacy-off")?.get_int(REMOTE_QTITLE_ACTION), Some(TITLE_REAL));
    assert_eq!(load(&store, "legacy-on")?.get_int(REMOTE_QTITLE_ACTION), Some(TITLE_EMPTY));
    assert_eq!(load(&store, "modern")?.get_int(REMOTE_QTITLE_ACTION), Some(0));
    Ok(())
}

#[test]
fn test_first_load_captures_registry() -> Result<()> {
    let registry = DefaultRegistry::new();
    let platform = StandardPlatform::new();

    assert!(registry.begin_capture());
    let mut conf = Conf::new();
    read_conf(&Resolver::new(None, &platform).capturing(&registry), &mut conf);
    registry.seal();

    assert_eq!(registry.get("PortNumber"), Some(ConfValue::Int(22)));
    assert_eq!(
        registry.get(TERMINAL_MODES),
        Some(ConfValue::Map(default_terminal_modes()))
    );
    assert!(registry.diff(&conf).is_empty(), "A fresh load matches every default");

    conf.set_int("PortNumber", 2022);
    let diff = registry.diff(&conf);
    assert_eq!(diff.len(), 1);
    assert_eq!(diff[0].key, "PortNumber");
    Ok(())
}

#[test]
fn test_save_writes_every_key() -> Result<()> {
    let store = MemoryStore::new();
    let conf = load(&store, "absent")?;
    save(&store, "s", &conf)?;
    let record = store.snapshot("s").expect("record");
    for key in stored_keys() {
        assert!(record.contains_key(&key), "missing {}", key);
    }
    Ok(())
}

#[test]
fn test_kind_lookup_and_parse() {
    assert!(matches!(kind_of("PortNumber"), Some(SettingKind::Int)));
    assert!(matches!(kind_of("Colour21"), Some(SettingKind::Int)));
    assert!(kind_of("Colour22").is_none());
    assert!(matches!(kind_of("Autocommand9"), Some(SettingKind::Str)));
    assert!(kind_of("Autocommand10").is_none());
    assert!(matches!(kind_of("Environment"), Some(SettingKind::Map(_))));
    assert!(kind_of("Nonsense").is_none());

    assert_eq!(parse_value("PortNumber", "0x16"), Some(ConfValue::Int(22)));
    assert_eq!(parse_value("PortNumber", "abc"), None);
    assert_eq!(
        parse_value("Font", "Hack,12,bold"),
        Some(ConfValue::Font(FontSpec::new("Hack", 12, 0, true)))
    );

    let prefs = parse_value("Cipher", "3des").expect("prefs");
    assert!(render_value("Cipher", &prefs).starts_with("3des,chacha20,aesgcm,aes,"));
    let font = ConfValue::Font(FontSpec::new("Hack", 12, 0, true));
    assert_eq!(render_value("Font", &font), "Hack,12,bold");
}
