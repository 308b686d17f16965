//! Typed accessors over the Store Interface.
//!
//! [`Resolver`] reads each setting through the chain stored value, then
//! platform default, then the caller's literal, recording literals into the
//! [`DefaultRegistry`] while the first full load is capturing. [`Emitter`]
//! is the write side.
use crate::settings::codec;
use crate::settings::conf::{indexed_key, ConfMap, ConfValue};
use crate::settings::defaults::DefaultRegistry;
use crate::settings::platform::PlatformDefaults;
use crate::settings::prefs::PrefTable;
use crate::storage::provider::{ReadHandle, WriteHandle};
use crate::storage::value::{Filename, FontSpec};

/// How a map-valued setting is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapEncoding {
    /// Write `key=value`; false writes bare keys
    pub with_values: bool,
    /// Apply the legacy dynamic-forwarding translation
    pub legacy_portfwd: bool,
}

impl MapEncoding {
    pub const VALUES: MapEncoding = MapEncoding {
        with_values: true,
        legacy_portfwd: false,
    };
    pub const KEYS_ONLY: MapEncoding = MapEncoding {
        with_values: false,
        legacy_portfwd: false,
    };
    pub const PORT_FORWARDS: MapEncoding = MapEncoding {
        with_values: true,
        legacy_portfwd: true,
    };

    pub fn parse(&self, text: &str) -> ConfMap {
        if self.legacy_portfwd {
            codec::parse_portfwd_map(text)
        } else {
            codec::parse_map(text)
        }
    }

    pub fn serialize(&self, map: &ConfMap) -> String {
        if self.legacy_portfwd {
            codec::serialize_portfwd_map(map)
        } else {
            codec::serialize_map(map, self.with_values)
        }
    }
}

/// Read side of the typed accessors
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    handle: Option<&'a ReadHandle>,
    platform: &'a dyn PlatformDefaults,
    registry: Option<&'a DefaultRegistry>,
}

impl<'a> Resolver<'a> {
    /// `handle` is `None` when the collection does not exist; every read
    /// then falls through to the defaults.
    pub fn new(handle: Option<&'a ReadHandle>, platform: &'a dyn PlatformDefaults) -> Self {
        Self {
            handle,
            platform,
            registry: None,
        }
    }

    /// Record literal defaults into `registry` as they are resolved
    pub fn capturing(mut self, registry: &'a DefaultRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub(crate) fn record(&self, key: &str, default: ConfValue) {
        if let Some(registry) = self.registry {
            registry.record(key, default);
        }
    }

    /// Resolve an integer without recording a default
    pub fn raw_int(&self, key: &str, default: i32) -> i32 {
        self.handle
            .and_then(|h| h.get_int(key))
            .or_else(|| self.platform.int(key))
            .unwrap_or(default)
    }

    /// Resolve a string without recording a default
    pub fn raw_string(&self, key: &str, default: &str) -> String {
        self.handle
            .and_then(|h| h.get_str(key))
            .or_else(|| self.platform.string(key))
            .unwrap_or_else(|| default.to_string())
    }

    pub fn int(&self, key: &str, default: i32) -> i32 {
        self.record(key, ConfValue::Int(default));
        self.raw_int(key, default)
    }

    /// Per-slot integer stored under `key` followed by `index`
    pub fn int_indexed(&self, key: &str, index: usize, default: i32) -> i32 {
        self.int(&indexed_key(key, index), default)
    }

    pub fn string(&self, key: &str, default: &str) -> String {
        self.record(key, ConfValue::Str(default.to_string()));
        self.raw_string(key, default)
    }

    pub fn string_indexed(&self, key: &str, index: usize, default: &str) -> String {
        self.string(&indexed_key(key, index), default)
    }

    /// File paths have no literal default; the platform always supplies one
    pub fn filename(&self, key: &str) -> Filename {
        let default = self.platform.filename(key);
        self.record(key, ConfValue::Filename(default.clone()));
        self.handle
            .and_then(|h| h.get_filename(key))
            .unwrap_or(default)
    }

    /// Fonts have no literal default; the platform always supplies one
    pub fn fontspec(&self, key: &str) -> FontSpec {
        let default = self.platform.fontspec(key);
        self.record(key, ConfValue::Font(default.clone()));
        match self.handle {
            Some(h) => h.read_fontspec(key, default),
            None => default,
        }
    }

    pub fn map(&self, key: &str, encoding: MapEncoding, default: &str) -> ConfMap {
        self.record(key, ConfValue::Map(encoding.parse(default)));
        encoding.parse(&self.raw_string(key, default))
    }

    pub fn prefs(&self, table: &PrefTable) -> Vec<i32> {
        self.record(table.key, ConfValue::Prefs(table.defaults()));
        table.parse(&self.raw_string(table.key, table.default))
    }
}

/// Write side of the typed accessors
#[derive(Debug)]
pub struct Emitter<'h, 'a> {
    handle: &'h mut WriteHandle<'a>,
}

impl<'h, 'a> Emitter<'h, 'a> {
    pub fn new(handle: &'h mut WriteHandle<'a>) -> Self {
        Self { handle }
    }

    pub fn int(&mut self, key: &str, value: i32) {
        self.handle.write_int(key, value);
    }

    pub fn int_indexed(&mut self, key: &str, index: usize, value: i32) {
        self.handle.write_int(&indexed_key(key, index), value);
    }

    pub fn string(&mut self, key: &str, value: &str) {
        self.handle.write_str(key, value);
    }

    pub fn string_indexed(&mut self, key: &str, index: usize, value: &str) {
        self.handle.write_str(&indexed_key(key, index), value);
    }

    pub fn filename(&mut self, key: &str, value: &Filename) {
        self.handle.write_filename(key, value);
    }

    pub fn fontspec(&mut self, key: &str, value: &FontSpec) {
        self.handle.write_fontspec(key, value);
    }

    pub fn map(&mut self, key: &str, encoding: MapEncoding, value: &ConfMap) {
        self.handle.write_str(key, &encoding.serialize(value));
    }

    pub fn prefs(&mut self, table: &PrefTable, ids: &[i32]) {
        self.handle.write_str(table.key, &table.serialize(ids));
    }
}
