//! Configuration management
//!
//! Loads the dashboard settings from a TOML file. Every field has a default so a
//! missing file or a partial file both work.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides the configuration file location.
pub const CONFIG_ENV_VAR: &str = "CLIMATE_DASH_CONFIG";

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "climate_dash.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Source file locations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSources {
    pub country_csv: PathBuf,
    pub global_csv: PathBuf,
    /// Optional; skipped with a warning when the file does not exist.
    pub city_csv: Option<PathBuf>,
}

impl Default for DataSources {
    fn default() -> Self {
        Self {
            country_csv: PathBuf::from("GlobalLandTemperaturesByCountry.csv"),
            global_csv: PathBuf::from("GlobalTemperatures.csv"),
            city_csv: Some(PathBuf::from("GlobalLandTemperaturesByMajorCity.csv")),
        }
    }
}

/// Page-level constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Earliest year shown by the warming, map and city pages.
    pub min_year: i32,
    /// Year marked on the warming-start chart.
    pub warming_reference_year: i32,
    /// Page shown at launch, by sidebar label or variant name.
    pub start_page: String,
    /// Measurement preselected on the warming page, by label or column name.
    pub measurement: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_year: 1850,
            warming_reference_year: 1975,
            start_page: "Home".to_string(),
            measurement: "Land Average Temperature".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataSources,
    pub views: ViewConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from the given file when it exists, defaults otherwise.
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the config location from the environment, falling back to the
    /// working directory.
    pub fn location() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}
