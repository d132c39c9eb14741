//! Configuration management with YAML support

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub archive: ArchiveConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

/// Remote archive service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// chess.com rejects requests without a descriptive User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Local files: per-player batch directories and the opening ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_ledger_path")]
    pub ledger_path: String,
}

/// Report thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_min_opening_games")]
    pub min_opening_games: usize,

    #[serde(default = "default_top_openings")]
    pub top_openings: usize,
}

// Default value functions
fn default_database_path() -> String {
    dirs::data_local_dir()
        .map(|dir| dir.join("chesstats").join("chess_data.db"))
        .unwrap_or_else(|| PathBuf::from("chess_data.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_base_url() -> String {
    "https://api.chess.com/pub".to_string()
}

fn default_user_agent() -> String {
    concat!("chesstats/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_data_dir() -> String {
    ".".to_string()
}

fn default_ledger_path() -> String {
    "opening_names.csv".to_string()
}

fn default_min_opening_games() -> usize {
    25
}

fn default_top_openings() -> usize {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            ledger_path: default_ledger_path(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            min_opening_games: default_min_opening_games(),
            top_openings: default_top_openings(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    /// Searches in order:
    /// 1. Provided path
    /// 2. ./chesstats.yaml (current directory)
    /// 3. ~/.config/chesstats/chesstats.yaml
    pub fn load(path: &str) -> Result<Self> {
        let search_paths = vec![
            shellexpand::tilde(path).to_string(),
            "chesstats.yaml".to_string(),
            shellexpand::tilde("~/.config/chesstats/chesstats.yaml").to_string(),
        ];

        for search_path in &search_paths {
            if std::path::Path::new(search_path).exists() {
                let content = std::fs::read_to_string(search_path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                tracing::debug!(path = %search_path, "loaded configuration");
                return Ok(config);
            }
        }

        // No config file found, use defaults
        Ok(Config::default())
    }

    /// Get the database path, expanding ~ to home directory
    pub fn database_path(&self) -> PathBuf {
        expand(&self.database.path)
    }

    pub fn data_dir(&self) -> PathBuf {
        expand(&self.storage.data_dir)
    }

    pub fn ledger_path(&self) -> PathBuf {
        expand(&self.storage.ledger_path)
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}
