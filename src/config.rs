// ABOUTME: Configuration management for Sakila Charts
// ABOUTME: Handles connection profiles and render preferences with extensible JSON format

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Config directory not found")]
    NoDirFound,
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),
}

/// Database engine, which also selects the SQL dialect of the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    #[default]
    SqlServer,
    Sqlite,
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseType::SqlServer => f.write_str("SQL Server"),
            DatabaseType::Sqlite => f.write_str("SQLite"),
        }
    }
}

/// Connection profile for a Sakila database.
///
/// For SQLite profiles `database` is the path of the database file and the
/// network fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionProfile {
    pub name: String,
    #[serde(rename = "type", default)]
    pub db_type: DatabaseType,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_true")]
    pub trust_certificate: bool,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    1433
}

fn default_database() -> String {
    "sakila".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ConnectionProfile {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            db_type: DatabaseType::SqlServer,
            host: default_host(),
            port: default_port(),
            username: "readonly".to_string(),
            password: String::new(),
            database: default_database(),
            trust_certificate: true,
        }
    }
}

/// Which renderer draws the charts
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RendererKind {
    #[default]
    Text,
    VegaLite,
}

/// Rendering preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    #[serde(default)]
    pub renderer: RendererKind,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_figure_width")]
    pub figure_width: u32,
    #[serde(default = "default_figure_height")]
    pub figure_height: u32,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("charts")
}

fn default_figure_width() -> u32 {
    1000
}

fn default_figure_height() -> u32 {
    600
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            renderer: RendererKind::default(),
            output_dir: default_output_dir(),
            figure_width: default_figure_width(),
            figure_height: default_figure_height(),
        }
    }
}

impl Preferences {
    pub fn figure_size(&self) -> (u32, u32) {
        (self.figure_width, self.figure_height)
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_active_profile")]
    pub active_profile: String,
    #[serde(default)]
    pub profiles: HashMap<String, ConnectionProfile>,
    #[serde(default)]
    pub preferences: Preferences,
}

fn default_version() -> u32 {
    1
}

fn default_active_profile() -> String {
    "default".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert("default".to_string(), ConnectionProfile::default());

        Self {
            version: 1,
            active_profile: "default".to_string(),
            profiles,
            preferences: Preferences::default(),
        }
    }
}

impl AppConfig {
    /// Get the config file path based on OS
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoDirFound)?;
        let app_dir = config_dir.join("Sakila Charts");
        Ok(app_dir.join("config.json"))
    }

    /// Load config from `path`, writing a default config there if it does not exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No config at {}, writing defaults", path.display());
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the active connection profile
    pub fn active_profile(&self) -> Result<&ConnectionProfile, ConfigError> {
        self.profile(&self.active_profile)
    }

    pub fn profile(&self, key: &str) -> Result<&ConnectionProfile, ConfigError> {
        self.profiles
            .get(key)
            .ok_or_else(|| ConfigError::ProfileNotFound(key.to_string()))
    }
}
