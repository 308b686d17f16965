/// Application name
pub const APP_NAME: &str = "termsess";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Schema version written into every saved record
pub const SCHEMA_VERSION: i32 = 3;

/// Key holding the schema version inside a record
pub const SCHEMA_VERSION_KEY: &str = "SchemaVersion";

/// Separator between the segments of a session path
pub const PATH_DELIMITER: char = '#';

/// Character substituted for the delimiter in user-supplied segment names
pub const DELIMITER_SUBSTITUTE: char = '_';

/// Pseudo-session holding the default settings
pub const DEFAULT_SETTINGS: &str = "Default Settings";

/// Pseudo-session holding application-wide settings
pub const GLOBAL_SETTINGS: &str = "Global Settings";

/// Pseudo-group listing attached devices
pub const DEVICE_FOLDER: &str = "Android Devices#";

/// Transient local shell session
pub const LOCAL_SHELL: &str = "Local Shell";

/// Transient local serial console session
pub const LOCAL_SERIAL: &str = "Local Serial";

/// Longest session path accepted when synthesizing duplicate names
pub const MAX_SESSION_NAME: usize = 256;

/// Number of autocommand slots per session
pub const AUTOCOMMAND_SLOTS: usize = 10;

/// Longest autocommand text accepted by the secret field codec
pub const AUTOCOMMAND_MAX_LEN: usize = 512;

/// Default configuration directory name
pub const CONFIG_DIR_NAME: &str = ".termsess";

/// Default session directory inside the configuration directory
pub const SESSIONS_DIR: &str = "sessions";

/// Default engine configuration file name
pub const CONFIG_FILE_NAME: &str = "termsess.toml";
