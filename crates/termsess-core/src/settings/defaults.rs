use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::settings::conf::{Conf, ConfValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// No load has run yet
    Empty,
    /// The first full load is resolving keys
    Capturing,
    /// Read-only from now on
    Sealed,
}

#[derive(Debug)]
struct RegistryState {
    phase: Phase,
    entries: BTreeMap<String, ConfValue>,
}

/// A setting whose current value differs from its recorded default
#[derive(Debug, Clone, PartialEq)]
pub struct SettingDiff {
    pub key: String,
    pub default: ConfValue,
    pub current: Option<ConfValue>,
}

/// Table of hard-coded defaults, captured during the first full load.
///
/// The table is written only while the first load runs and is read-only
/// once [`DefaultRegistry::seal`] has been called. The lock covers the
/// transition for engines shared across threads.
#[derive(Debug)]
pub struct DefaultRegistry {
    state: Mutex<RegistryState>,
}

impl Default for DefaultRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultRegistry {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState {
                phase: Phase::Empty,
                entries: BTreeMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        // The state stays consistent even if a holder panicked mid-insert
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start capturing if nothing has been captured yet. Returns true when
    /// the caller's load is the capturing one.
    pub fn begin_capture(&self) -> bool {
        let mut state = self.lock();
        if state.phase == Phase::Empty {
            state.phase = Phase::Capturing;
            true
        } else {
            false
        }
    }

    /// Finish capturing; the table is read-only afterwards
    pub fn seal(&self) {
        let mut state = self.lock();
        if state.phase == Phase::Capturing {
            log::debug!("Default registry sealed with {} entries", state.entries.len());
            state.phase = Phase::Sealed;
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.lock().phase == Phase::Sealed
    }

    /// Record the default for `key`. Only the first recording of a key
    /// during the capture phase is kept.
    pub fn record(&self, key: &str, default: ConfValue) {
        let mut state = self.lock();
        if state.phase != Phase::Capturing {
            return;
        }
        state.entries.entry(key.to_string()).or_insert(default);
    }

    pub fn get(&self, key: &str) -> Option<ConfValue> {
        self.lock().entries.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every recorded (key, default) pair, ordered by key
    pub fn entries(&self) -> Vec<(String, ConfValue)> {
        self.lock()
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Settings in `conf` that differ from their recorded default
    pub fn diff(&self, conf: &Conf) -> Vec<SettingDiff> {
        self.lock()
            .entries
            .iter()
            .filter_map(|(key, default)| {
                let current = conf.get(key);
                if current == Some(default) {
                    None
                } else {
                    Some(SettingDiff {
                        key: key.clone(),
                        default: default.clone(),
                        current: current.cloned(),
                    })
                }
            })
            .collect()
    }
}
