use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;

use log::info;
use termsess_core::kernel::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use termsess_core::kernel::open_store_at;
use termsess_core::settings::schema;
use termsess_core::storage::ConfigFormat;
use termsess_core::{Application, ConfValue, EngineConfig, SessionManager, SessionPath, StoreKind};

use crate::cli::{CliArgs, Commands};

pub type CliResult<T> = Result<T, Box<dyn Error>>;

/// Build the engine configuration from `--config` and `--store`
fn engine_config(args: &CliArgs) -> CliResult<EngineConfig> {
    let path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    let mut config = EngineConfig::load(&path)?;

    if let Some(store) = &args.store {
        config.store = match ConfigFormat::from_path(store) {
            Some(_) => StoreKind::Document,
            None => StoreKind::Files,
        };
        config.root = store.clone();
        config.document_format = None;
    }
    Ok(config)
}

fn parse_path(text: &str) -> CliResult<SessionPath> {
    Ok(SessionPath::parse(text)?)
}

fn parse_paths(texts: &[String]) -> CliResult<Vec<SessionPath>> {
    texts.iter().map(|text| parse_path(text)).collect()
}

fn print_values<'a>(values: impl Iterator<Item = (&'a str, &'a ConfValue)>, json: bool) -> CliResult<()> {
    let rendered: BTreeMap<&str, String> = values
        .map(|(key, value)| (key, schema::render_value(key, value)))
        .collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        for (key, value) in rendered {
            println!("{}={}", key, value);
        }
    }
    Ok(())
}

/// Run one command against the configured engine
pub fn run(args: CliArgs) -> CliResult<()> {
    let mut config = engine_config(&args)?;
    if matches!(args.command, Commands::Migrate) {
        // The command reports the sweep itself
        config.migrate_on_start = false;
    }

    let app = Application::new(config)?;
    if let Some(report) = app.migration_report() {
        if !report.upgraded.is_empty() {
            info!("Upgraded {} records at start-up", report.upgraded.len());
        }
    }
    execute(app.manager(), args.command)
}

fn execute(manager: &SessionManager, command: Commands) -> CliResult<()> {
    match command {
        Commands::List { group, raw } => {
            if let Some(group) = group {
                for member in manager.group_members(&parse_path(&group)?)? {
                    println!("{}", member);
                }
            } else if raw {
                for name in manager.store().enumerate()? {
                    println!("{}", name);
                }
            } else {
                for name in &manager.list()? {
                    println!("{}", name);
                }
            }
        }
        Commands::Show { path, json } => {
            let conf = manager.load(&parse_path(&path)?)?;
            print_values(conf.iter(), json)?;
        }
        Commands::Diff { path } => {
            let diffs = manager.diff(&parse_path(&path)?)?;
            if diffs.is_empty() {
                println!("No settings differ from their defaults.");
            }
            for diff in diffs {
                let current = match &diff.current {
                    Some(value) => schema::render_value(&diff.key, value),
                    None => "<unset>".to_string(),
                };
                println!(
                    "{}={} (default: {})",
                    diff.key,
                    current,
                    schema::render_value(&diff.key, &diff.default)
                );
            }
        }
        Commands::Set { path, key, value } => {
            let path = parse_path(&path)?;
            if schema::kind_of(&key).is_none() {
                return Err(format!("unknown setting '{}'", key).into());
            }
            let parsed = schema::parse_value(&key, &value)
                .ok_or_else(|| format!("'{}' is not a valid value for '{}'", value, key))?;
            manager.update(&path, |conf| conf.set(key.as_str(), parsed))?;
            println!("Set {} on '{}'.", key, path);
        }
        Commands::Hide { path, slot, reveal } => {
            let path = parse_path(&path)?;
            manager.set_autocommand_hidden(&path, slot, !reveal)?;
            let state = if reveal { "revealed" } else { "hidden" };
            println!("Autocommand {} of '{}' is now {}.", slot, path, state);
        }
        Commands::Create { path } => {
            let path = parse_path(&path)?;
            manager.create(&path)?;
            println!("Created session '{}'.", path);
        }
        Commands::CreateGroup { path } => {
            let path = parse_path(&path)?;
            manager.create_group(&path)?;
            println!("Created group '{}'.", path);
        }
        Commands::Rename { from, to } => {
            let (from, to) = (parse_path(&from)?, parse_path(&to)?);
            manager.rename(&from, &to)?;
            println!("Renamed '{}' to '{}'.", from, to);
        }
        Commands::Move { path, group } => {
            let path = parse_path(&path)?;
            let group = group.as_deref().map(parse_path).transpose()?;
            let moved = manager.move_to(&path, group.as_ref())?;
            println!("Moved '{}' to '{}'.", path, moved);
        }
        Commands::Copy { from, to } => {
            let (from, to) = (parse_path(&from)?, parse_path(&to)?);
            manager.copy(&from, &to)?;
            println!("Copied '{}' to '{}'.", from, to);
        }
        Commands::Duplicate { path } => {
            let path = parse_path(&path)?;
            let copy = manager.duplicate(&path)?;
            println!("Duplicated '{}' as '{}'.", path, copy);
        }
        Commands::Delete { path } => {
            let path = parse_path(&path)?;
            let removed = manager.delete(&path)?;
            println!("Deleted '{}' ({} entries).", path, removed);
        }
        Commands::Export { target, paths } => {
            let store = open_store_at(&target)?;
            let count = manager.export(store.as_ref(), &parse_paths(&paths)?)?;
            println!("Exported {} entries to {}.", count, target.display());
        }
        Commands::Import { source, paths } => {
            if !source.exists() {
                return Err(format!("nothing to import at {}", source.display()).into());
            }
            let store = open_store_at(&source)?;
            let count = manager.import(store.as_ref(), &parse_paths(&paths)?, None)?;
            println!("Imported {} entries from {}.", count, source.display());
        }
        Commands::Migrate => {
            let report = manager.migrate_all()?;
            println!(
                "Checked {} records, upgraded {}.",
                report.checked,
                report.upgraded.len()
            );
            for name in report.upgraded {
                println!("  - {}", name);
            }
            for name in report.skipped {
                println!("  ! {} could not be re-encoded and was left as is", name);
            }
        }
        Commands::Defaults { json } => {
            let defaults = manager.defaults();
            print_values(defaults.iter().map(|(key, value)| (key.as_str(), value)), json)?;
        }
    }
    Ok(())
}
