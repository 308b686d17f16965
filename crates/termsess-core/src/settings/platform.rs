use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::storage::value::{Filename, FontSpec, StoredValue};

/// Platform layer of the default chain: stored value, then this, then the
/// hard-coded literal.
///
/// Integer and string defaults are optional. File and font defaults are
/// mandatory because their shape has no plain literal form.
pub trait PlatformDefaults: Send + Sync + Debug {
    fn int(&self, _key: &str) -> Option<i32> {
        None
    }

    fn string(&self, _key: &str) -> Option<String> {
        None
    }

    fn filename(&self, key: &str) -> Filename;

    fn fontspec(&self, key: &str) -> FontSpec;
}

/// Built-in platform defaults, optionally overridden from configuration
#[derive(Debug, Clone, Default)]
pub struct StandardPlatform {
    overrides: BTreeMap<String, StoredValue>,
}

impl StandardPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: BTreeMap<String, StoredValue>) -> Self {
        Self { overrides }
    }

    fn override_text(&self, key: &str) -> Option<String> {
        self.overrides.get(key).map(StoredValue::as_text)
    }
}

#[cfg(windows)]
const DEFAULT_FONT: &str = "Courier New";
#[cfg(not(windows))]
const DEFAULT_FONT: &str = "Monospace";

#[cfg(windows)]
const DEFAULT_SERIAL_LINE: &str = "COM1";
#[cfg(not(windows))]
const DEFAULT_SERIAL_LINE: &str = "/dev/ttyS0";

impl PlatformDefaults for StandardPlatform {
    fn int(&self, key: &str) -> Option<i32> {
        self.overrides.get(key).and_then(StoredValue::as_int)
    }

    fn string(&self, key: &str) -> Option<String> {
        if let Some(value) = self.override_text(key) {
            return Some(value);
        }
        match key {
            "SerialLine" => Some(DEFAULT_SERIAL_LINE.to_string()),
            _ => None,
        }
    }

    fn filename(&self, key: &str) -> Filename {
        if let Some(value) = self.override_text(key) {
            return Filename::new(value);
        }
        match key {
            "LogFileName" => Filename::new("termsess.log"),
            _ => Filename::default(),
        }
    }

    fn fontspec(&self, key: &str) -> FontSpec {
        let name = self
            .override_text(&FontSpec::name_key(key))
            .unwrap_or_else(|| DEFAULT_FONT.to_string());
        let height = self
            .overrides
            .get(&FontSpec::height_key(key))
            .and_then(StoredValue::as_int)
            .unwrap_or(10);
        FontSpec::new(name, height, 0, key == "BoldFont")
    }
}
