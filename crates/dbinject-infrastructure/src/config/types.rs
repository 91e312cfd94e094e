//! Configuration types

use std::path::PathBuf;

use dbinject_domain::{ConfigOptions, ConnectOptions, DriverOptions};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CLIENT, DEFAULT_LOG_LEVEL};

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Database settings
    pub database: DatabaseSettings,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Emit JSON instead of human-readable lines
    pub json_format: bool,
    /// Optional log file; rotated daily
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_owned(),
            json_format: false,
            file_output: None,
        }
    }
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Client adapter name (`postgres` or `null`)
    pub client: String,
    /// Connect options
    pub connect: ConnectOptions,
    /// Client behavior options
    pub config: ConfigOptions,
    /// Driver tuning options
    pub driver: DriverOptions,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            client: DEFAULT_CLIENT.to_owned(),
            connect: ConnectOptions::default(),
            config: ConfigOptions::default(),
            driver: DriverOptions::default(),
        }
    }
}
