use std::fmt;
use std::sync::Arc;

use crate::kernel::constants::{
    AUTOCOMMAND_SLOTS, DEFAULT_SETTINGS, MAX_SESSION_NAME, PATH_DELIMITER, SCHEMA_VERSION,
    SCHEMA_VERSION_KEY,
};
use crate::kernel::error::{Error, Result};
use crate::session::error::SessionError;
use crate::session::namespace::{is_reserved, sessioncmp, SessionList};
use crate::session::path::SessionPath;
use crate::session::templates;
use crate::settings::accessors::{Emitter, Resolver};
use crate::settings::conf::{indexed_key, Conf, ConfValue};
use crate::settings::defaults::{DefaultRegistry, SettingDiff};
use crate::settings::platform::PlatformDefaults;
use crate::settings::schema;
use crate::settings::secret::AUTOCOMMAND_HIDDEN;
use crate::storage::error::StoreError;
use crate::storage::provider::{ReadHandle, Record, SettingsStore, WriteHandle};
use crate::storage::value::StoredValue;

/// Outcome of a schema migration sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Stored records inspected
    pub checked: usize,
    /// Records rewritten at the current schema version
    pub upgraded: Vec<String>,
    /// Records left untouched because they could not be re-encoded
    pub skipped: Vec<String>,
}

/// The CRUD orchestrator.
///
/// Every operation works against the primary store and builds a fresh
/// [`SessionList`] when it needs the namespace. Operations that can collide
/// check for collisions before mutating anything. Group cascades run to
/// completion once started; there are no transactions.
pub struct SessionManager {
    store: Arc<dyn SettingsStore>,
    platform: Arc<dyn PlatformDefaults>,
    registry: DefaultRegistry,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SettingsStore>, platform: Arc<dyn PlatformDefaults>) -> Self {
        Self {
            store,
            platform,
            registry: DefaultRegistry::new(),
        }
    }

    /// The primary store
    pub fn store(&self) -> &dyn SettingsStore {
        self.store.as_ref()
    }

    pub fn platform(&self) -> &dyn PlatformDefaults {
        self.platform.as_ref()
    }

    /// Defaults captured during the first load
    pub fn registry(&self) -> &DefaultRegistry {
        &self.registry
    }

    /// Sorted snapshot of the namespace
    pub fn list(&self) -> Result<SessionList> {
        Ok(SessionList::build(self.store())?)
    }

    /// True when a session exists, or a group has at least one member
    pub fn exists(&self, path: &SessionPath) -> Result<bool> {
        let list = self.list()?;
        Ok(if path.is_group() {
            list.contains_prefix(path.as_str())
        } else {
            list.contains(path.as_str()) || is_reserved(path.as_str())
        })
    }

    /// Stored members of a group, in namespace order. Stored names that do
    /// not form valid paths are skipped.
    pub fn group_members(&self, group: &SessionPath) -> Result<Vec<SessionPath>> {
        require_group(group)?;
        let list = self.list()?;
        let members = list
            .prefix_run(group.as_str())
            .iter()
            .filter(|name| !is_reserved(name))
            .filter_map(|name| match SessionPath::parse(name) {
                Ok(path) => Some(path),
                Err(e) => {
                    log::warn!("Skipping stored entry: {}", e);
                    None
                }
            })
            .collect();
        Ok(members)
    }

    /// Load a session. A session missing from the store loads as defaults;
    /// only an I/O failure opening the store is an error.
    pub fn load(&self, path: &SessionPath) -> Result<Conf> {
        require_session(path)?;
        self.load_from(self.store(), path.as_str())
    }

    /// The configuration new sessions start from
    pub fn load_defaults(&self) -> Result<Conf> {
        self.load_from(self.store(), DEFAULT_SETTINGS)
    }

    /// Replace the stored record of a session with `conf`. Reserved names
    /// are never persisted; saving one succeeds without touching the store.
    pub fn save(&self, path: &SessionPath, conf: &Conf) -> Result<()> {
        require_session(path)?;
        self.save_to(self.store(), path.as_str(), conf)
    }

    /// Load, modify and save a session in one step
    pub fn update<F>(&self, path: &SessionPath, apply: F) -> Result<Conf>
    where
        F: FnOnce(&mut Conf),
    {
        let mut conf = self.load(path)?;
        apply(&mut conf);
        self.save(path, &conf)?;
        Ok(conf)
    }

    /// Create a session from the default settings
    pub fn create(&self, path: &SessionPath) -> Result<()> {
        require_session(path)?;
        let list = self.list()?;
        check_free(&list, path)?;
        let conf = self.load_defaults()?;
        self.save(path, &conf)?;
        log::info!("Created session '{}'", path);
        Ok(())
    }

    /// Create an empty group, stored as a marker record
    pub fn create_group(&self, path: &SessionPath) -> Result<()> {
        require_group(path)?;
        let list = self.list()?;
        check_free(&list, path)?;
        write_marker(self.store(), path.as_str())?;
        log::info!("Created group '{}'", path);
        Ok(())
    }

    /// Rename a session or group. Both paths must be of the same kind.
    pub fn rename(&self, from: &SessionPath, to: &SessionPath) -> Result<()> {
        if from == to {
            return Ok(());
        }
        match (from.is_group(), to.is_group()) {
            (true, true) => self.rename_group(from, to),
            (false, false) => self.rename_session(from, to),
            (true, false) => Err(SessionError::NotAGroup { path: to.to_string() }.into()),
            (false, true) => Err(SessionError::NotASession { path: to.to_string() }.into()),
        }
    }

    /// Move a session or group into `group`; `None` moves it to the top
    /// level. Returns the new path.
    pub fn move_to(&self, path: &SessionPath, group: Option<&SessionPath>) -> Result<SessionPath> {
        if let Some(group) = group {
            require_group(group)?;
        }
        let parent = path.parent();
        let dest = path.rebase(parent.as_ref(), group)?;
        self.rename(path, &dest)?;
        Ok(dest)
    }

    /// Copy a session or group under a new name, keeping the source
    pub fn copy(&self, from: &SessionPath, to: &SessionPath) -> Result<()> {
        if from.is_group() != to.is_group() {
            return Err(kind_mismatch(to));
        }
        let list = self.list()?;
        let members = existing_members(&list, from)?;
        if from.is_group() && to.starts_with(from) {
            return Err(SessionError::GroupIntoItself {
                from: from.to_string(),
                to: to.to_string(),
            }
            .into());
        }
        check_free(&list, to)?;

        let moves = rebased(&members, from, to);
        self.transfer(self.store(), &moves, self.store())?;
        log::info!("Copied '{}' to '{}' ({} entries)", from, to, members.len());
        Ok(())
    }

    /// Copy a session or group under the first free name of the form
    /// `name (n)`. Returns the new path.
    pub fn duplicate(&self, path: &SessionPath) -> Result<SessionPath> {
        let list = self.list()?;
        let members = existing_members(&list, path)?;
        let dest = unique_name(&list, path)?;

        let moves = rebased(&members, path, &dest);
        self.transfer(self.store(), &moves, self.store())?;
        log::info!("Duplicated '{}' as '{}'", path, dest);
        Ok(dest)
    }

    /// Delete a session, or a group with everything under it. Returns the
    /// number of stored records removed. Reserved names are left alone.
    pub fn delete(&self, path: &SessionPath) -> Result<usize> {
        if is_reserved(path.as_str()) {
            log::debug!("Ignoring delete of reserved entry '{}'", path);
            return Ok(0);
        }
        let list = self.list()?;
        let members = existing_members(&list, path)?;
        for member in &members {
            self.store.delete(member)?;
        }
        if path.is_group() {
            log::info!("Deleted group '{}' ({} entries)", path, members.len());
        } else {
            log::info!("Deleted session '{}'", path);
        }
        Ok(members.len())
    }

    /// Write sessions into `target`, overwriting what is there. An empty
    /// `paths` exports every stored session. Returns the number written.
    pub fn export(&self, target: &dyn SettingsStore, paths: &[SessionPath]) -> Result<usize> {
        let list = self.list()?;
        let names = expand(&list, paths)?;
        self.transfer(self.store(), &unchanged(&names), target)?;
        log::info!("Exported {} entries to store '{}'", names.len(), target.name());
        Ok(names.len())
    }

    /// Read sessions from `source` into the primary store, overwriting what
    /// is there. An empty `paths` imports everything in `source`.
    ///
    /// When `current` names an imported session, its in-memory configuration
    /// is reloaded from the primary store.
    pub fn import(
        &self,
        source: &dyn SettingsStore,
        paths: &[SessionPath],
        current: Option<(&SessionPath, &mut Conf)>,
    ) -> Result<usize> {
        let list = SessionList::build(source)?;
        let names = expand(&list, paths)?;
        self.transfer(source, &unchanged(&names), self.store())?;
        log::info!("Imported {} entries from store '{}'", names.len(), source.name());

        if let Some((path, conf)) = current {
            if names.iter().any(|name| name == path.as_str()) {
                *conf = self.load(path)?;
                log::debug!("Reloaded open session '{}' after import", path);
            }
        }
        Ok(names.len())
    }

    /// Rewrite every stored record whose schema version differs from the
    /// current one. A second sweep finds nothing to do.
    pub fn migrate_all(&self) -> Result<MigrationReport> {
        let list = self.list()?;
        let mut report = MigrationReport::default();

        for name in list.stored() {
            let handle = match self.store.open_read(name) {
                Ok(handle) => handle,
                Err(StoreError::NotFound { .. }) => continue,
                Err(e) => return Err(e.into()),
            };
            report.checked += 1;
            let version = handle.get_int(SCHEMA_VERSION_KEY);
            handle.close();
            if version == Some(SCHEMA_VERSION) {
                continue;
            }

            log::debug!(
                "Migrating '{}' from schema version {:?} to {}",
                name,
                version,
                SCHEMA_VERSION
            );
            match self.encode_entry(self.store(), name, self.store(), name) {
                Ok(record) => {
                    self.store.commit(name, record)?;
                    report.upgraded.push(name.to_string());
                }
                Err(Error::Codec(e)) => {
                    log::warn!("Leaving '{}' at schema version {:?}: {}", name, version, e);
                    report.skipped.push(name.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        log::info!(
            "Migration sweep checked {} records, upgraded {}",
            report.checked,
            report.upgraded.len()
        );
        Ok(report)
    }

    /// Flip the hidden flag of one autocommand slot in the stored record.
    ///
    /// Only the flag is written. The stored text is re-encoded on the next
    /// save of the session.
    pub fn set_autocommand_hidden(&self, path: &SessionPath, slot: usize, hidden: bool) -> Result<()> {
        require_session(path)?;
        if slot >= AUTOCOMMAND_SLOTS {
            return Err(SessionError::SlotOutOfRange {
                slot,
                limit: AUTOCOMMAND_SLOTS,
            }
            .into());
        }
        if is_reserved(path.as_str()) {
            return Ok(());
        }
        if !self.list()?.contains(path.as_str()) {
            return Err(SessionError::not_found(path.as_str()).into());
        }

        let mut handle = self.store.open_write(path.as_str())?;
        handle.write_int(&indexed_key(AUTOCOMMAND_HIDDEN, slot), i32::from(hidden));
        handle.close()?;
        Ok(())
    }

    /// Settings of a session that differ from the captured defaults
    pub fn diff(&self, path: &SessionPath) -> Result<Vec<SettingDiff>> {
        let conf = self.load(path)?;
        Ok(self.registry.diff(&conf))
    }

    /// Every captured default, running the capture first if nothing has
    /// been loaded yet
    pub fn defaults(&self) -> Vec<(String, ConfValue)> {
        if !self.registry.is_sealed() {
            self.resolve(None);
        }
        self.registry.entries()
    }

    fn resolve(&self, handle: Option<&ReadHandle>) -> Conf {
        let capturing = self.registry.begin_capture();
        let mut resolver = Resolver::new(handle, self.platform());
        if capturing {
            resolver = resolver.capturing(&self.registry);
        }

        let mut conf = Conf::new();
        schema::read_conf(&resolver, &mut conf);

        if capturing {
            self.registry.seal();
        }
        conf
    }

    fn load_from(&self, store: &dyn SettingsStore, name: &str) -> Result<Conf> {
        if is_reserved(name) {
            let mut conf = self.resolve(None);
            if templates::apply_template(name, &mut conf) {
                log::debug!("Loaded local service '{}' from its template", name);
            }
            return Ok(conf);
        }

        let handle = match store.open_read(name) {
            Ok(handle) => Some(handle),
            Err(StoreError::NotFound { .. }) => None,
            Err(e) => return Err(e.into()),
        };
        let conf = self.resolve(handle.as_ref());
        if let Some(handle) = handle {
            handle.close();
        }
        Ok(conf)
    }

    /// Replace the record under `name` with `conf`. The record is encoded in
    /// full before the store is touched, and the commit replaces it whole.
    fn save_to(&self, store: &dyn SettingsStore, name: &str, conf: &Conf) -> Result<()> {
        if is_reserved(name) {
            log::debug!("Not persisting reserved session '{}'", name);
            return Ok(());
        }
        let record = encode(store, name, conf)?;
        store.commit(name, record)?;
        log::debug!("Saved '{}' to store '{}'", name, store.name());
        Ok(())
    }

    /// Record a stored entry becomes when copied; group markers are
    /// rewritten, sessions go through a full load
    fn encode_entry(
        &self,
        source: &dyn SettingsStore,
        from: &str,
        target: &dyn SettingsStore,
        to: &str,
    ) -> Result<Record> {
        if from.ends_with(PATH_DELIMITER) {
            return Ok(marker_record());
        }
        let conf = self.load_from(source, from)?;
        encode(target, to, &conf)
    }

    /// Copy entries from `source` to `target` as `(from, to)` pairs. Every
    /// record is encoded before the first commit, so an entry that cannot be
    /// encoded leaves `target` untouched.
    fn transfer(
        &self,
        source: &dyn SettingsStore,
        moves: &[(String, String)],
        target: &dyn SettingsStore,
    ) -> Result<()> {
        let mut staged = Vec::with_capacity(moves.len());
        for (from, to) in moves {
            staged.push((to, self.encode_entry(source, from, target, to)?));
        }
        for (to, record) in staged {
            target.commit(to, record)?;
        }
        Ok(())
    }

    fn rename_session(&self, from: &SessionPath, to: &SessionPath) -> Result<()> {
        let list = self.list()?;
        let members = existing_members(&list, from)?;
        check_free(&list, to)?;

        let moves = rebased(&members, from, to);
        self.transfer(self.store(), &moves, self.store())?;
        self.store.delete(from.as_str())?;
        log::info!("Renamed session '{}' to '{}'", from, to);
        Ok(())
    }

    fn rename_group(&self, from: &SessionPath, to: &SessionPath) -> Result<()> {
        if to.starts_with(from) {
            return Err(SessionError::GroupIntoItself {
                from: from.to_string(),
                to: to.to_string(),
            }
            .into());
        }
        let list = self.list()?;
        let members = existing_members(&list, from)?;
        check_free(&list, to)?;

        let moves = rebased(&members, from, to);
        self.transfer(self.store(), &moves, self.store())?;
        for member in &members {
            self.store.delete(member)?;
        }
        log::info!("Moved group '{}' to '{}' ({} entries)", from, to, members.len());
        Ok(())
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("store", &self.store.name())
            .field("platform", &self.platform)
            .field("defaults_captured", &self.registry.len())
            .finish()
    }
}

fn require_session(path: &SessionPath) -> Result<()> {
    if path.is_group() {
        return Err(SessionError::NotASession { path: path.to_string() }.into());
    }
    Ok(())
}

fn require_group(path: &SessionPath) -> Result<()> {
    if !path.is_group() {
        return Err(SessionError::NotAGroup { path: path.to_string() }.into());
    }
    Ok(())
}

fn kind_mismatch(to: &SessionPath) -> Error {
    if to.is_group() {
        SessionError::NotASession { path: to.to_string() }.into()
    } else {
        SessionError::NotAGroup { path: to.to_string() }.into()
    }
}

/// Fail with a collision when `path` is taken. Groups collide by prefix.
fn check_free(list: &SessionList, path: &SessionPath) -> Result<()> {
    let taken = if path.is_group() {
        list.contains_prefix(path.as_str())
    } else {
        list.contains(path.as_str()) || is_reserved(path.as_str())
    };
    if taken {
        return Err(SessionError::collision(path.as_str()).into());
    }
    Ok(())
}

/// Stored entries a session or group operation applies to. Reserved
/// entries are refused; a path with no stored entry is not found.
fn existing_members(list: &SessionList, path: &SessionPath) -> Result<Vec<String>> {
    if is_reserved(path.as_str()) {
        return Err(SessionError::invalid_path(path.as_str(), "reserved name").into());
    }
    let members: Vec<String> = if path.is_group() {
        list.prefix_run(path.as_str())
            .iter()
            .filter(|name| !is_reserved(name))
            .cloned()
            .collect()
    } else if list.contains(path.as_str()) {
        vec![path.to_string()]
    } else {
        Vec::new()
    };
    if members.is_empty() {
        return Err(SessionError::not_found(path.as_str()).into());
    }
    Ok(members)
}

/// Stored names selected by `paths`, in namespace order, without
/// duplicates or reserved entries. Empty `paths` selects everything.
fn expand(list: &SessionList, paths: &[SessionPath]) -> Result<Vec<String>> {
    let mut names: Vec<String> = if paths.is_empty() {
        list.stored().map(str::to_string).collect()
    } else {
        let mut names = Vec::new();
        for path in paths {
            names.extend(existing_members(list, path)?);
        }
        names
    };
    names.retain(|name| !is_reserved(name));
    names.sort_by(|a, b| sessioncmp(a, b));
    names.dedup();
    Ok(names)
}

fn rebase_name(name: &str, from: &str, to: &str) -> String {
    format!("{}{}", to, name.strip_prefix(from).unwrap_or(name))
}

/// `(member, destination)` pairs for moving `members` from one path to another
fn rebased(members: &[String], from: &SessionPath, to: &SessionPath) -> Vec<(String, String)> {
    members
        .iter()
        .map(|member| (member.clone(), rebase_name(member, from.as_str(), to.as_str())))
        .collect()
}

fn unchanged(names: &[String]) -> Vec<(String, String)> {
    names.iter().map(|name| (name.clone(), name.clone())).collect()
}

/// Encode `conf` into a complete record without touching the store
fn encode(store: &dyn SettingsStore, name: &str, conf: &Conf) -> Result<Record> {
    let mut handle = WriteHandle::new(store, name, Record::new());
    schema::write_conf(&mut Emitter::new(&mut handle), conf)?;
    Ok(handle.into_record())
}

fn marker_record() -> Record {
    Record::from([(SCHEMA_VERSION_KEY.to_string(), StoredValue::Int(SCHEMA_VERSION))])
}

fn unique_name(list: &SessionList, path: &SessionPath) -> Result<SessionPath> {
    let text = path.as_str();
    let (base, suffix) = match text.strip_suffix(PATH_DELIMITER) {
        Some(base) => (base, PATH_DELIMITER.to_string()),
        None => (text, String::new()),
    };

    let mut n: u64 = 1;
    loop {
        let candidate = format!("{} ({}){}", base, n, suffix);
        if candidate.chars().count() > MAX_SESSION_NAME {
            return Err(SessionError::NameTooLong {
                name: candidate,
                limit: MAX_SESSION_NAME,
            }
            .into());
        }
        let taken = if path.is_group() {
            list.contains_prefix(&candidate)
        } else {
            list.contains(&candidate) || is_reserved(&candidate)
        };
        if !taken {
            return Ok(SessionPath::parse(&candidate)?);
        }
        n += 1;
    }
}

fn write_marker(store: &dyn SettingsStore, name: &str) -> Result<()> {
    store.commit(name, marker_record())?;
    Ok(())
}
