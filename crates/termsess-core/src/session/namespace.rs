//! Session namespace: the presentation order and the sorted session list.
//!
//! Group cascades rely on [`sessioncmp`] placing every path that starts with
//! a group prefix in one contiguous run, so that a binary search for the
//! prefix followed by a forward scan visits exactly the group's members.
use std::cmp::Ordering;

use crate::kernel::constants::{
    DEFAULT_SETTINGS, DEVICE_FOLDER, GLOBAL_SETTINGS, LOCAL_SERIAL, LOCAL_SHELL,
};
use crate::storage::error::StoreResult;
use crate::storage::provider::SettingsStore;

/// Entries present in every session list regardless of store contents
pub const SYNTHETIC_ENTRIES: [&str; 3] = [DEFAULT_SETTINGS, GLOBAL_SETTINGS, DEVICE_FOLDER];

/// Sessions that exist only in memory and are loaded from templates
pub const LOCAL_SERVICES: [&str; 2] = [LOCAL_SHELL, LOCAL_SERIAL];

/// True for names that must never be persisted, listed from the store, or
/// exported
pub fn is_reserved(name: &str) -> bool {
    SYNTHETIC_ENTRIES.contains(&name) || is_local_service(name)
}

pub fn is_local_service(name: &str) -> bool {
    LOCAL_SERVICES.contains(&name)
}

fn rank(name: &str) -> u8 {
    if name == DEFAULT_SETTINGS {
        0
    } else if name == GLOBAL_SETTINGS {
        1
    } else if name == DEVICE_FOLDER {
        2
    } else if name.starts_with(DEVICE_FOLDER) {
        3
    } else {
        4
    }
}

/// Total order used to present and search session names: default settings,
/// global settings, the device folder and its contents, then everything
/// else by byte value.
pub fn sessioncmp(a: &str, b: &str) -> Ordering {
    rank(a)
        .cmp(&rank(b))
        .then_with(|| a.as_bytes().cmp(b.as_bytes()))
}

/// Index of the first entry not ordered before `name`
pub fn lower_bound_in_sesslist<S: AsRef<str>>(list: &[S], name: &str) -> usize {
    list.partition_point(|entry| sessioncmp(entry.as_ref(), name) == Ordering::Less)
}

/// The contiguous run of `list` whose entries start with `prefix`
pub fn prefix_run<'l, S: AsRef<str>>(list: &'l [S], prefix: &str) -> &'l [S] {
    let start = lower_bound_in_sesslist(list, prefix);
    let len = list[start..]
        .iter()
        .take_while(|entry| entry.as_ref().starts_with(prefix))
        .count();
    &list[start..start + len]
}

/// Sorted snapshot of the namespace: the synthetic entries followed by every
/// stored name. Built on demand and never updated; rebuild after mutating
/// the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionList {
    entries: Vec<String>,
}

impl SessionList {
    /// Enumerate `store` and build a sorted list
    pub fn build(store: &dyn SettingsStore) -> StoreResult<Self> {
        let list = Self::from_stored(store.enumerate()?);
        log::debug!(
            "Built session list with {} entries from store '{}'",
            list.len(),
            store.name()
        );
        Ok(list)
    }

    /// Build a list from stored names. Reserved names are dropped from the
    /// stored set; the synthetic entries are always added.
    pub fn from_stored<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<String> = SYNTHETIC_ENTRIES.iter().map(|s| s.to_string()).collect();
        for name in names {
            let name = name.into();
            if is_reserved(&name) {
                log::debug!("Ignoring stored record with reserved name '{}'", name);
                continue;
            }
            entries.push(name);
        }
        entries.sort_by(|a, b| sessioncmp(a, b));
        entries.dedup();
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Entries backed by a stored record (everything but the synthetic ones)
    pub fn stored(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|name| !SYNTHETIC_ENTRIES.contains(name))
    }

    pub fn lower_bound(&self, name: &str) -> usize {
        lower_bound_in_sesslist(&self.entries, name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.get(self.lower_bound(name)).is_some_and(|e| e == name)
    }

    /// True when any entry lies under the group prefix `prefix`
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        !self.prefix_run(prefix).is_empty()
    }

    /// Entries starting with `prefix`, in order
    pub fn prefix_run(&self, prefix: &str) -> &[String] {
        prefix_run(&self.entries, prefix)
    }
}

impl<'a> IntoIterator for &'a SessionList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
