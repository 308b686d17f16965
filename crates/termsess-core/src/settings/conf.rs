use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::storage::value::{Filename, FontSpec};

/// Ordered string-keyed sub-map (environment, forwardings, terminal modes...)
pub type ConfMap = BTreeMap<String, String>;

/// A typed configuration value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ConfValue {
    Int(i32),
    Str(String),
    Filename(Filename),
    Font(FontSpec),
    Map(ConfMap),
    /// Ranked preference list, as ids from a preference table
    Prefs(Vec<i32>),
}

impl ConfValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ConfValue::Int(_) => "int",
            ConfValue::Str(_) => "string",
            ConfValue::Filename(_) => "filename",
            ConfValue::Font(_) => "font",
            ConfValue::Map(_) => "map",
            ConfValue::Prefs(_) => "prefs",
        }
    }
}

/// In-memory configuration of one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conf {
    #[serde(flatten)]
    values: BTreeMap<String, ConfValue>,
}

impl Conf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, key: &str) -> Option<&ConfValue> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: ConfValue) {
        self.values.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfValue> {
        self.values.remove(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        match self.values.get(key) {
            Some(ConfValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i32) {
        self.set(key, ConfValue::Int(value));
    }

    /// Per-slot integer, stored under `key` followed by the slot index
    pub fn get_int_indexed(&self, key: &str, index: usize) -> Option<i32> {
        self.get_int(&indexed_key(key, index))
    }

    pub fn set_int_indexed(&mut self, key: &str, index: usize, value: i32) {
        self.set_int(indexed_key(key, index), value);
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(ConfValue::Str(v)) => Some(v),
            _ => None,
        }
    }

    pub fn set_str(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set(key, ConfValue::Str(value.into()));
    }

    pub fn get_str_indexed(&self, key: &str, index: usize) -> Option<&str> {
        self.get_str(&indexed_key(key, index))
    }

    pub fn set_str_indexed(&mut self, key: &str, index: usize, value: impl Into<String>) {
        self.set_str(indexed_key(key, index), value);
    }

    pub fn get_filename(&self, key: &str) -> Option<&Filename> {
        match self.values.get(key) {
            Some(ConfValue::Filename(v)) => Some(v),
            _ => None,
        }
    }

    pub fn set_filename(&mut self, key: impl Into<String>, value: Filename) {
        self.set(key, ConfValue::Filename(value));
    }

    pub fn get_font(&self, key: &str) -> Option<&FontSpec> {
        match self.values.get(key) {
            Some(ConfValue::Font(v)) => Some(v),
            _ => None,
        }
    }

    pub fn set_font(&mut self, key: impl Into<String>, value: FontSpec) {
        self.set(key, ConfValue::Font(value));
    }

    pub fn get_map(&self, key: &str) -> Option<&ConfMap> {
        match self.values.get(key) {
            Some(ConfValue::Map(v)) => Some(v),
            _ => None,
        }
    }

    pub fn set_map(&mut self, key: impl Into<String>, value: ConfMap) {
        self.set(key, ConfValue::Map(value));
    }

    /// Mutable access to a sub-map, creating it (or replacing a value of
    /// another type) if needed
    pub fn map_mut(&mut self, key: &str) -> &mut ConfMap {
        let slot = self
            .values
            .entry(key.to_string())
            .or_insert_with(|| ConfValue::Map(ConfMap::new()));
        if !matches!(slot, ConfValue::Map(_)) {
            *slot = ConfValue::Map(ConfMap::new());
        }
        match slot {
            ConfValue::Map(map) => map,
            _ => unreachable!("slot was just set to a map"),
        }
    }

    pub fn get_prefs(&self, key: &str) -> Option<&[i32]> {
        match self.values.get(key) {
            Some(ConfValue::Prefs(v)) => Some(v),
            _ => None,
        }
    }

    pub fn set_prefs(&mut self, key: impl Into<String>, value: Vec<i32>) {
        self.set(key, ConfValue::Prefs(value));
    }
}

/// `key` followed by a slot index, e.g. `Colour5`
pub fn indexed_key(key: &str, index: usize) -> String {
    format!("{}{}", key, index)
}
