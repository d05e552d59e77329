//! Configuration for roster.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{RosterError, RosterResult};

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file holding both the employee records
    /// and the version entries.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let roster_dir = dirs::home_dir()
            .map(|h| h.join(".roster"))
            .unwrap_or_else(|| PathBuf::from(".roster"));
        Self {
            path: roster_dir.join("roster.db"),
        }
    }
}

/// History listing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Page size used when the caller does not specify one.
    pub default_page_size: u32,
    /// Upper bound on the caller-supplied page size.
    pub max_page_size: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

/// Main roster configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub database: DatabaseConfig,
    pub history: HistoryConfig,
}

impl RosterConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> RosterResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| RosterError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| RosterError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| RosterError::Configuration(e.to_string())),
            _ => Err(RosterError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables, starting from defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("ROSTER_DB_PATH") {
            config.database.path = PathBuf::from(path);
        }
        if let Ok(size) = std::env::var("ROSTER_HISTORY_PAGE_SIZE") {
            if let Ok(size) = size.parse() {
                config.history.default_page_size = size;
            }
        }

        config
    }

    /// Clamp a caller-supplied page size into the configured bounds.
    pub fn clamp_page_size(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.history.default_page_size)
            .clamp(1, self.history.max_page_size)
    }
}
