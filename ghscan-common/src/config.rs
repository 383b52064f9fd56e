//! Bootstrap configuration loading
//!
//! The TOML file holds bootstrap settings only: database location, Snyk API
//! pacing and logging. Credentials come from the environment and are never
//! read from the file except for the database password.
//!
//! # Settings Sources Priority
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Built-in defaults (code constants)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory name under the platform config dir
const CONFIG_DIR_NAME: &str = "ghscan";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub database: DatabaseSection,

    #[serde(default)]
    pub snyk: SnykSection,

    #[serde(default)]
    pub pipeline: PipelineSection,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[database]` table
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DatabaseSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// `[snyk]` table
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SnykSection {
    /// API base URL, e.g. `https://snyk.io/api/v1`
    pub api_url: Option<String>,
    /// Replenishment interval of the shared rate gate
    pub rate_interval_ms: Option<u64>,
    /// Burst capacity of the shared rate gate
    pub rate_burst: Option<u32>,
}

/// `[pipeline]` table
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PipelineSection {
    /// Capacity of the worker → writer handoff channel
    pub handoff_capacity: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default config file location: `<config_dir>/ghscan/config.toml`
///
/// Returns `None` when the platform has no config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the bootstrap TOML config
///
/// An explicit path must exist. Without one, the default location is tried
/// and a missing file falls back to built-in defaults. A file that exists
/// but does not parse is always an error.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                debug!("No config file found, using built-in defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    let config = read_toml_config(&path)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Parse a TOML config file at `path`
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
