use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// termsess: manage saved terminal sessions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Engine configuration file (JSON, YAML or TOML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Operate on this store instead of the configured one: a directory, or
    /// a .json/.yaml/.toml document
    #[arg(long, global = true, value_name = "DIR|FILE")]
    pub store: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List sessions in display order, or the members of one group
    List {
        /// Group to list, e.g. "Work#"
        group: Option<String>,
        /// Print stored names exactly as the store enumerates them
        #[arg(long, conflicts_with = "group")]
        raw: bool,
    },
    /// Print the settings of a session
    Show {
        path: String,
        /// Print a JSON object instead of key=value lines
        #[arg(long)]
        json: bool,
    },
    /// Print settings that differ from their defaults
    Diff { path: String },
    /// Change one setting of a session
    Set {
        path: String,
        key: String,
        value: String,
    },
    /// Hide (or reveal) the text of an autocommand slot
    Hide {
        path: String,
        slot: usize,
        /// Store the slot as plain text again
        #[arg(long)]
        reveal: bool,
    },
    /// Create a session from the default settings
    Create { path: String },
    /// Create an empty group
    CreateGroup { path: String },
    /// Rename a session or group
    Rename { from: String, to: String },
    /// Move a session or group into a group, or to the top level when no
    /// group is given
    Move { path: String, group: Option<String> },
    /// Copy a session or group to a new name
    Copy { from: String, to: String },
    /// Copy a session or group under the first free "name (n)" name
    Duplicate { path: String },
    /// Delete a session or a group and everything in it
    Delete { path: String },
    /// Write sessions to a directory or document; all sessions when none are named
    Export {
        target: PathBuf,
        paths: Vec<String>,
    },
    /// Read sessions from a directory or document; everything when none are named
    Import {
        source: PathBuf,
        paths: Vec<String>,
    },
    /// Rewrite stored records at the current schema version
    Migrate,
    /// Print the default value of every setting
    Defaults {
        /// Print a JSON object instead of key=value lines
        #[arg(long)]
        json: bool,
    },
}
