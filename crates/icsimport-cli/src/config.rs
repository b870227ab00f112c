//! CLI configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/icsimport/config.toml` by default:
//!
//! ```toml
//! [import]
//! duplicate_handling = "replace_any"
//! default_reminders = [10]
//!
//! [store]
//! path = "/home/me/calendars.json"
//! ```

use std::path::{Path, PathBuf};

use icsimport_engine::ImportOptions;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Configuration for the icsimport CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Import defaults, overridable per command.
    pub import: ImportOptions,

    /// Store settings.
    pub store: StoreSettings,
}

/// Where the JSON store lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Path to the store file.
    pub path: Option<PathBuf>,
}

impl AppConfig {
    /// Loads configuration from the default path, or defaults if absent.
    pub fn load() -> CliResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Returns the store path, preferring `override_path`.
    pub fn store_path(&self, override_path: Option<&Path>) -> PathBuf {
        override_path
            .map(Path::to_path_buf)
            .or_else(|| self.store.path.clone())
            .unwrap_or_else(|| Self::default_data_dir().join("store.json"))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("icsimport")
    }

    /// Returns the default data directory path.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("icsimport")
    }
}
