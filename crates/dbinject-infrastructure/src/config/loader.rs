//! Configuration loader
//!
//! Loads configuration from defaults, a TOML file and environment variables
//! using Figment.

use std::env;
use std::path::{Path, PathBuf};

use dbinject_domain::error::{Error, Result};
use dbinject_domain::{ConfigOptions, ConnectOptions, DriverOptions};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};

use crate::config::{AppConfig, LoggingConfig};
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_owned(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (if exists)
    /// 3. Environment variables, e.g. `DBINJECT__DATABASE__CONNECT__HOST`
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            } else {
                log_config_loaded(config_path, false);
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        let prefix = format!("{}{}", self.env_prefix, CONFIG_ENV_SEPARATOR);
        figment = figment.merge(Env::prefixed(&prefix).split(CONFIG_ENV_SEPARATOR));

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find the first existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let mut candidates = vec![
            current_dir.join(DEFAULT_CONFIG_FILENAME),
            current_dir
                .join(DEFAULT_CONFIG_DIR)
                .join(DEFAULT_CONFIG_FILENAME),
        ];
        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME));
        }

        candidates.into_iter().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate application configuration
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    parse_log_level(&config.logging.level)?;
    validate_connect_options(&config.database.connect)?;
    if config.database.client.trim().is_empty() {
        return Err(Error::configuration("Database client name cannot be empty"));
    }
    Ok(())
}

/// Validate connect options before they reach a client
pub fn validate_connect_options(options: &ConnectOptions) -> Result<()> {
    if options.host.trim().is_empty() {
        return Err(Error::configuration("Database host cannot be empty"));
    }
    if options.port == 0 {
        return Err(Error::configuration("Database port cannot be 0"));
    }
    if options.database.trim().is_empty() {
        return Err(Error::configuration("Database name cannot be empty"));
    }
    if let (Some(min), Some(max)) = (options.min, options.max)
        && min > max
    {
        return Err(Error::configuration(format!(
            "Pool minimum ({min}) cannot exceed pool maximum ({max})"
        )));
    }
    if options.max == Some(0) || options.pool_size == Some(0) {
        return Err(Error::configuration("Pool size cannot be 0"));
    }
    Ok(())
}

/// Configuration builder for programmatic configuration
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: AppConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set logging configuration
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Set the client adapter name
    pub fn with_client<S: Into<String>>(mut self, client: S) -> Self {
        self.config.database.client = client.into();
        self
    }

    /// Set connect options
    pub fn with_connect(mut self, connect: ConnectOptions) -> Self {
        self.config.database.connect = connect;
        self
    }

    /// Set config options
    pub fn with_config(mut self, config: ConfigOptions) -> Self {
        self.config.database.config = config;
        self
    }

    /// Set driver options
    pub fn with_driver(mut self, driver: DriverOptions) -> Self {
        self.config.database.driver = driver;
        self
    }

    /// Build the configuration
    pub fn build(self) -> AppConfig {
        self.config
    }
}
