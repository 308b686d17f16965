use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
#[cfg(feature = "yaml-config")]
use serde_yaml;
#[cfg(feature = "toml-config")]
use toml;

use crate::kernel::constants;
use crate::storage::error::{StoreError, StoreResult};
use crate::storage::value::StoredValue;

/// Supported document formats for engine configuration and document stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    /// JSON format (.json)
    #[default]
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }

    /// Serialize a value to a string in this format
    pub fn serialize<T: Serialize>(&self, value: &T) -> StoreResult<String> {
        let wrap = |source: Box<dyn std::error::Error + Send + Sync>| StoreError::Serialization {
            format: self.extension().to_string(),
            source,
        };
        match self {
            ConfigFormat::Json => serde_json::to_string_pretty(value).map_err(|e| wrap(Box::new(e))),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(value).map_err(|e| wrap(Box::new(e))),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(value).map_err(|e| wrap(Box::new(e))),
        }
    }

    /// Deserialize a value from a string in this format
    pub fn deserialize<T: DeserializeOwned>(&self, data: &str) -> StoreResult<T> {
        let wrap = |source: Box<dyn std::error::Error + Send + Sync>| StoreError::Deserialization {
            format: self.extension().to_string(),
            source,
        };
        match self {
            ConfigFormat::Json => serde_json::from_str(data).map_err(|e| wrap(Box::new(e))),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| wrap(Box::new(e))),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| wrap(Box::new(e))),
        }
    }
}

/// Which backend the engine persists sessions in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Volatile in-memory store
    Memory,
    /// One flat file per session inside a directory
    #[default]
    Files,
    /// All sessions inside a single serialized document
    Document,
}

/// Engine configuration, read from a JSON/YAML/TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Backend holding the primary session store
    pub store: StoreKind,
    /// Directory (files) or document path (document)
    pub root: PathBuf,
    /// Format of the document store; derived from `root` when absent
    pub document_format: Option<ConfigFormat>,
    /// Run the schema migration sweep when the engine starts
    pub migrate_on_start: bool,
    /// Platform default overrides, consulted before hard-coded defaults
    pub platform_defaults: BTreeMap<String, StoredValue>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::Files,
            root: PathBuf::from(constants::CONFIG_DIR_NAME).join(constants::SESSIONS_DIR),
            document_format: None,
            migrate_on_start: true,
            platform_defaults: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a file, choosing the format by extension.
    /// A missing file yields the default configuration.
    pub fn load(path: &Path) -> StoreResult<Self> {
        if !path.exists() {
            log::debug!("No engine configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| StoreError::UnsupportedFormat(path.display().to_string()))?;
        let content = fs::read_to_string(path)
            .map_err(|e| StoreError::io(e, "read_config", path))?;
        let config: EngineConfig = format.deserialize(&content)?;
        log::info!("Loaded engine configuration from {}", path.display());
        Ok(config)
    }

    /// Write configuration to a file, choosing the format by extension
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| StoreError::UnsupportedFormat(path.display().to_string()))?;
        let content = format.serialize(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(e, "create_dir_all", parent))?;
        }
        fs::write(path, content).map_err(|e| StoreError::io(e, "write_config", path))
    }

    /// Format used by a document store at `root`
    pub fn resolved_document_format(&self) -> ConfigFormat {
        self.document_format
            .or_else(|| ConfigFormat::from_path(&self.root))
            .unwrap_or_default()
    }
}
