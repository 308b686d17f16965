//! The persisted settings of a session, field by field.
//!
//! [`read_conf`] and [`write_conf`] walk [`FIELDS`] in order, then handle
//! the fields with special rules: the remote title migration, terminal mode
//! completion, and the autocommand table.
use crate::kernel::constants::{AUTOCOMMAND_SLOTS, SCHEMA_VERSION, SCHEMA_VERSION_KEY};
use crate::settings::accessors::{Emitter, MapEncoding, Resolver};
use crate::settings::codec;
use crate::settings::conf::{indexed_key, Conf, ConfMap, ConfValue};
use crate::settings::prefs::{self, PrefTable};
use crate::settings::secret::{self, CodecError};
use crate::storage::value::{Filename, FontSpec};

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Int(i32),
    Str(&'static str),
    Filename,
    Font,
    Map {
        encoding: MapEncoding,
        default: &'static str,
    },
    Prefs(&'static PrefTable),
    /// `len` integers stored as `key0`, `key1`, ...
    IntTable {
        len: usize,
        default: fn(usize) -> i32,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub key: &'static str,
    pub kind: FieldKind,
}

const fn int(key: &'static str, default: i32) -> Field {
    Field { key, kind: FieldKind::Int(default) }
}

const fn string(key: &'static str, default: &'static str) -> Field {
    Field { key, kind: FieldKind::Str(default) }
}

const fn filename(key: &'static str) -> Field {
    Field { key, kind: FieldKind::Filename }
}

const fn font(key: &'static str) -> Field {
    Field { key, kind: FieldKind::Font }
}

const fn map(key: &'static str, encoding: MapEncoding) -> Field {
    Field { key, kind: FieldKind::Map { encoding, default: "" } }
}

const fn pref(table: &'static PrefTable) -> Field {
    Field { key: table.key, kind: FieldKind::Prefs(table) }
}

pub const TERMINAL_MODES: &str = "TerminalModes";
pub const REMOTE_QTITLE_ACTION: &str = "RemoteQTitleAction";
pub const LEGACY_NO_REMOTE_QTITLE: &str = "NoRemoteQTitle";

/// Remote title query answered with an empty title
pub const TITLE_EMPTY: i32 = 1;
/// Remote title query answered with the real title
pub const TITLE_REAL: i32 = 2;

/// Value given to terminal modes left to the automatic default
pub const MODE_AUTO: &str = "A";

/// Every terminal mode a session can override
pub const TERMINAL_MODE_NAMES: &[&str] = &[
    "INTR", "QUIT", "ERASE", "KILL", "EOF", "EOL", "EOL2", "START", "STOP", "SUSP", "DSUSP",
    "REPRINT", "WERASE", "LNEXT", "FLUSH", "SWTCH", "STATUS", "DISCARD", "IGNPAR", "PARMRK",
    "INPCK", "ISTRIP", "INLCR", "IGNCR", "ICRNL", "IUCLC", "IXON", "IXANY", "IXOFF", "IMAXBEL",
    "IUTF8", "ISIG", "ICANON", "XCASE", "ECHO", "ECHOE", "ECHOK", "ECHONL", "NOFLSH", "TOSTOP",
    "IEXTEN", "ECHOCTL", "ECHOKE", "PENDIN", "OPOST", "OLCUC", "ONLCR", "OCRNL", "ONOCR",
    "ONLRET", "CS7", "CS8", "PARENB", "PARODD",
];

const COLOURS: [i32; 22] = [
    0xBBBBBB, 0xFFFFFF, 0x000000, 0x555555, 0x000000, 0x00FF00, 0x000000, 0x555555, 0xBB0000,
    0xFF5555, 0x00BB00, 0x55FF55, 0xBBBB00, 0xFFFF55, 0x0000BB, 0x5555FF, 0xBB00BB, 0xFF55FF,
    0x00BBBB, 0x55FFFF, 0xBBBBBB, 0xFFFFFF,
];

fn default_colour(index: usize) -> i32 {
    COLOURS.get(index).copied().unwrap_or(0)
}

/// Character class used for double-click word selection
fn default_wordness(index: usize) -> i32 {
    let Ok(byte) = u8::try_from(index) else {
        return 1;
    };
    let ch = char::from(byte);
    if ch.is_ascii_alphanumeric() || "-./_~".contains(ch) {
        2
    } else if ch == ' ' || (ch.is_ascii_control() && ch != '\x7f') {
        0
    } else {
        1
    }
}

pub static FIELDS: &[Field] = &[
    string("HostName", ""),
    string("LogHost", ""),
    string("Protocol", "ssh"),
    int("PortNumber", 22),
    int("AddressFamily", 0),
    int("CloseOnExit", 1),
    int("WarnOnClose", 1),
    int("PingInterval", 0),
    int("TCPNoDelay", 1),
    int("TCPKeepalives", 0),
    string("TerminalType", "xterm"),
    string("TerminalSpeed", "38400,38400"),
    map(TERMINAL_MODES, MapEncoding::VALUES),
    string("UserName", ""),
    map("Environment", MapEncoding::VALUES),
    string("ProxyHost", "proxy"),
    int("ProxyPort", 80),
    string("ProxyUsername", ""),
    string("ProxyTelnetCommand", "connect %host %port\\n"),
    string("RemoteCommand", ""),
    int("Compression", 0),
    int("SshProt", 3),
    int("SshNoShell", 0),
    int("AgentFwd", 0),
    int("X11Forward", 0),
    pref(&prefs::CIPHERS),
    pref(&prefs::KEX),
    pref(&prefs::HOST_KEYS),
    pref(&prefs::GSS_LIBS),
    filename("PublicKeyFile"),
    int("LocalPortAcceptAll", 0),
    int("RemotePortAcceptAll", 0),
    map("PortForwardings", MapEncoding::PORT_FORWARDS),
    map("SSHManualHostKeys", MapEncoding::KEYS_ONLY),
    int("BackspaceIsDelete", 1),
    int("RXVTHomeEnd", 0),
    int("LinuxFunctionKeys", 0),
    int("NoApplicationKeys", 0),
    int("NoApplicationCursors", 0),
    int("AltF4", 1),
    int("AltSpace", 0),
    int("AltOnly", 0),
    int("LocalEcho", 2),
    int("LocalEdit", 2),
    string("Answerback", "termsess"),
    int("TermWidth", 80),
    int("TermHeight", 24),
    font("Font"),
    font("BoldFont"),
    int("ScrollbackLines", 2000),
    int("ScrollBar", 1),
    int("ScrollOnKey", 0),
    int("ScrollOnDisp", 1),
    int("LockSize", 0),
    int("BCE", 1),
    int("BlinkText", 0),
    int("BlinkCur", 0),
    int("CurType", 0),
    int("Beep", 1),
    int("BellOverload", 1),
    filename("BellWaveFile"),
    string("WinTitle", ""),
    int("BoldAsColour", 1),
    int("Xterm256Colour", 1),
    int("TrueColour", 1),
    Field {
        key: "Colour",
        kind: FieldKind::IntTable { len: COLOURS.len(), default: default_colour },
    },
    Field {
        key: "Wordness",
        kind: FieldKind::IntTable { len: 128, default: default_wordness },
    },
    string("LineCodePage", ""),
    int("UTF8Override", 1),
    int("LogType", 0),
    filename("LogFileName"),
    int("LogFileClash", -1),
    int("LogFlush", 1),
    string("SerialLine", ""),
    int("SerialSpeed", 9600),
    int("SerialDataBits", 8),
    int("SerialStopHalfbits", 2),
    int("SerialParity", 0),
    int("SerialFlowControl", 1),
];

/// Look up a top-level field
pub fn field(key: &str) -> Option<&'static Field> {
    FIELDS.iter().find(|f| f.key == key)
}

/// Default terminal mode map: every known mode set to automatic
pub fn default_terminal_modes() -> ConfMap {
    TERMINAL_MODE_NAMES
        .iter()
        .map(|name| (name.to_string(), MODE_AUTO.to_string()))
        .collect()
}

/// Populate `conf` from a resolver, field by field. `conf` is cleared first.
pub fn read_conf(resolver: &Resolver<'_>, conf: &mut Conf) {
    conf.clear();
    resolver.record(TERMINAL_MODES, ConfValue::Map(default_terminal_modes()));

    for field in FIELDS {
        match field.kind {
            FieldKind::Int(default) => conf.set_int(field.key, resolver.int(field.key, default)),
            FieldKind::Str(default) => conf.set_str(field.key, resolver.string(field.key, default)),
            FieldKind::Filename => conf.set_filename(field.key, resolver.filename(field.key)),
            FieldKind::Font => conf.set_font(field.key, resolver.fontspec(field.key)),
            FieldKind::Map { encoding, default } => {
                conf.set_map(field.key, resolver.map(field.key, encoding, default))
            }
            FieldKind::Prefs(table) => conf.set_prefs(field.key, resolver.prefs(table)),
            FieldKind::IntTable { len, default } => {
                for index in 0..len {
                    let value = resolver.int_indexed(field.key, index, default(index));
                    conf.set_int_indexed(field.key, index, value);
                }
            }
        }
    }

    migrate_terminal_modes(conf);
    migrate_remote_qtitle(resolver, conf);
    secret::read_autocommands(resolver, conf);
}

/// Every known mode missing from the stored map is added as automatic
fn migrate_terminal_modes(conf: &mut Conf) {
    let modes = conf.map_mut(TERMINAL_MODES);
    for name in TERMINAL_MODE_NAMES {
        modes
            .entry(name.to_string())
            .or_insert_with(|| MODE_AUTO.to_string());
    }
}

/// Older records carry a boolean `NoRemoteQTitle`; its value picks the
/// default for `RemoteQTitleAction`
fn migrate_remote_qtitle(resolver: &Resolver<'_>, conf: &mut Conf) {
    let legacy = resolver.raw_int(LEGACY_NO_REMOTE_QTITLE, 1);
    let default = if legacy != 0 { TITLE_EMPTY } else { TITLE_REAL };
    conf.set_int(REMOTE_QTITLE_ACTION, resolver.int(REMOTE_QTITLE_ACTION, default));
}

/// Write every field of `conf`. Fields missing from `conf` are written with
/// their literal default.
pub fn write_conf(emitter: &mut Emitter<'_, '_>, conf: &Conf) -> Result<(), CodecError> {
    emitter.int(SCHEMA_VERSION_KEY, SCHEMA_VERSION);

    for field in FIELDS {
        match field.kind {
            FieldKind::Int(default) => {
                emitter.int(field.key, conf.get_int(field.key).unwrap_or(default))
            }
            FieldKind::Str(default) => {
                emitter.string(field.key, conf.get_str(field.key).unwrap_or(default))
            }
            FieldKind::Filename => {
                let value = conf.get_filename(field.key).cloned().unwrap_or_default();
                emitter.filename(field.key, &value);
            }
            FieldKind::Font => {
                if let Some(value) = conf.get_font(field.key) {
                    emitter.fontspec(field.key, value);
                }
            }
            FieldKind::Map { encoding, default } => {
                let value = conf
                    .get_map(field.key)
                    .cloned()
                    .unwrap_or_else(|| encoding.parse(default));
                emitter.map(field.key, encoding, &value);
            }
            FieldKind::Prefs(table) => {
                let value = conf
                    .get_prefs(field.key)
                    .map(<[i32]>::to_vec)
                    .unwrap_or_else(|| table.defaults());
                emitter.prefs(table, &value);
            }
            FieldKind::IntTable { len, default } => {
                for index in 0..len {
                    let value = conf
                        .get_int_indexed(field.key, index)
                        .unwrap_or_else(|| default(index));
                    emitter.int_indexed(field.key, index, value);
                }
            }
        }
    }

    let qtitle = conf.get_int(REMOTE_QTITLE_ACTION).unwrap_or(TITLE_EMPTY);
    emitter.int(REMOTE_QTITLE_ACTION, qtitle);

    secret::write_autocommands(emitter, conf)
}

/// Storage type of a setting key, including indexed keys such as `Colour3`
#[derive(Debug, Clone, Copy)]
pub enum SettingKind {
    Int,
    Str,
    Filename,
    Font,
    Map(MapEncoding),
    Prefs(&'static PrefTable),
}

pub fn kind_of(key: &str) -> Option<SettingKind> {
    if let Some(field) = field(key) {
        return Some(match field.kind {
            FieldKind::Int(_) => SettingKind::Int,
            FieldKind::Str(_) => SettingKind::Str,
            FieldKind::Filename => SettingKind::Filename,
            FieldKind::Font => SettingKind::Font,
            FieldKind::Map { encoding, .. } => SettingKind::Map(encoding),
            FieldKind::Prefs(table) => SettingKind::Prefs(table),
            FieldKind::IntTable { .. } => return None,
        });
    }
    if key == REMOTE_QTITLE_ACTION {
        return Some(SettingKind::Int);
    }

    let (base, index) = split_index(key)?;
    if base == secret::AUTOCOMMAND {
        return (index < AUTOCOMMAND_SLOTS).then_some(SettingKind::Str);
    }
    if base == secret::AUTOCOMMAND_DELAY || base == secret::AUTOCOMMAND_HIDDEN {
        return (index < AUTOCOMMAND_SLOTS).then_some(SettingKind::Int);
    }
    match field(base)?.kind {
        FieldKind::IntTable { len, .. } if index < len => Some(SettingKind::Int),
        _ => None,
    }
}

fn split_index(key: &str) -> Option<(&str, usize)> {
    let digits = key.len() - key.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 || digits == key.len() {
        return None;
    }
    let (base, index) = key.split_at(key.len() - digits);
    Some((base, index.parse().ok()?))
}

/// Parse user-supplied text into a value of the setting's kind.
///
/// Fonts are written `name,height[,bold]`; maps use the map codec; prefs are
/// comma separated names.
pub fn parse_value(key: &str, text: &str) -> Option<ConfValue> {
    Some(match kind_of(key)? {
        SettingKind::Int => ConfValue::Int(parse_int(text)?),
        SettingKind::Str => ConfValue::Str(text.to_string()),
        SettingKind::Filename => ConfValue::Filename(Filename::new(text)),
        SettingKind::Font => {
            let mut parts = text.split(',').map(str::trim);
            let name = parts.next().filter(|n| !n.is_empty())?;
            let height = parts.next().map(str::parse::<i32>).transpose().ok()?.unwrap_or(10);
            let is_bold = parts.next().is_some_and(|b| b.eq_ignore_ascii_case("bold"));
            ConfValue::Font(FontSpec::new(name, height, 0, is_bold))
        }
        SettingKind::Map(encoding) => ConfValue::Map(encoding.parse(text)),
        SettingKind::Prefs(table) => ConfValue::Prefs(table.parse(text)),
    })
}

fn parse_int(text: &str) -> Option<i32> {
    let text = text.trim();
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => i32::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

/// Render a value as the single line a user would type for it
pub fn render_value(key: &str, value: &ConfValue) -> String {
    match value {
        ConfValue::Int(v) => v.to_string(),
        ConfValue::Str(s) => s.clone(),
        ConfValue::Filename(f) => f.to_string(),
        ConfValue::Font(f) => {
            let mut text = format!("{},{}", f.name, f.height);
            if f.is_bold {
                text.push_str(",bold");
            }
            text
        }
        ConfValue::Map(m) => match kind_of(key) {
            Some(SettingKind::Map(encoding)) => encoding.serialize(m),
            _ => codec::serialize_map(m, true),
        },
        ConfValue::Prefs(ids) => match field(key).map(|f| f.kind) {
            Some(FieldKind::Prefs(table)) => table.serialize(ids),
            _ => ids.iter().map(i32::to_string).collect::<Vec<_>>().join(","),
        },
    }
}

/// Every storage key a full save writes, in write order
pub fn stored_keys() -> Vec<String> {
    let mut keys = vec![SCHEMA_VERSION_KEY.to_string()];
    for field in FIELDS {
        match field.kind {
            FieldKind::Font => {
                keys.push(FontSpec::name_key(field.key));
                keys.push(FontSpec::height_key(field.key));
                keys.push(FontSpec::charset_key(field.key));
                keys.push(FontSpec::bold_key(field.key));
            }
            FieldKind::IntTable { len, .. } => {
                keys.extend((0..len).map(|i| indexed_key(field.key, i)));
            }
            _ => keys.push(field.key.to_string()),
        }
    }
    keys.push(REMOTE_QTITLE_ACTION.to_string());
    for slot in 0..AUTOCOMMAND_SLOTS {
        for base in [
            secret::AUTOCOMMAND,
            secret::AUTOCOMMAND_ENCRYPTED,
            secret::AUTOCOMMAND_DELAY,
            secret::AUTOCOMMAND_HIDDEN,
        ] {
            keys.push(indexed_key(base, slot));
        }
    }
    keys
}
