/// Service configuration loader - parses climate.toml
///
/// Separates deployment settings from code, making it easy to point the
/// service at a different dataset snapshot, port, or reference date
/// without recompiling.

use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Config file expected in the current working directory.
pub const DEFAULT_CONFIG_PATH: &str = "climate.toml";

/// Service settings loaded from climate.toml. Every field is optional in
/// the file; missing fields fall back to the defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Path to the pre-populated SQLite dataset. The `DATABASE_PATH`
    /// environment variable (or a .env entry) overrides this at runtime.
    pub database_path: String,

    /// Address and port the HTTP endpoint binds to.
    pub bind_address: String,
    pub port: u16,

    /// Number of request worker threads. Each worker opens its own
    /// database connection per request; there is no shared session.
    pub workers: usize,

    /// Upper bound of the dataset. The precipitation lookback window and
    /// the open-range temperature summary both anchor to this date
    /// rather than querying max(date) on every request. Defaults to the
    /// last observation date in the published dataset.
    pub reference_date: NaiveDate,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database_path: "Resources/hawaii.sqlite".to_string(),
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            workers: 4,
            reference_date: dataset_reference_date(),
        }
    }
}

/// Last observation date in the published dataset (2017-08-23).
pub fn dataset_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 8, 23).expect("literal date is valid")
}

/// Configuration loading failure.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file exists but could not be read.
    ReadFailed(String, std::io::Error),
    /// Config file could not be parsed as TOML.
    ParseFailed(String, toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadFailed(path, e) => {
                write!(f, "Failed to read {}: {}", path, e)
            }
            ConfigError::ParseFailed(path, e) => {
                write!(f, "Failed to parse {}: {}", path, e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServiceConfig {
    /// Loads settings from a TOML file.
    ///
    /// A missing file is not an error — the service runs on defaults so a
    /// bare checkout works against the bundled dataset path. A present
    /// but malformed file fails startup with a clear message.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFailed(path.to_string(), e))?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseFailed(path.to_string(), e))
    }
}
