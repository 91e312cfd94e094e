//! Infrastructure layer constants
//!
//! Domain token names live in `dbinject_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "dbinject.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "dbinject";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "DBINJECT";

/// Separator between nested keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

/// Default client adapter name
pub const DEFAULT_CLIENT: &str = "postgres";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Environment variable overriding the log filter
pub const LOG_ENV_VAR: &str = "DBINJECT_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log file name stem used by the rolling appender
pub const LOG_FILE_STEM: &str = "dbinject";

// ============================================================================
// MODULE AND TOKEN NAMES
// ============================================================================

/// Name of the database module
pub const DATABASE_MODULE_NAME: &str = "DatabaseModule";

/// Name of the configuration module
pub const CONFIG_MODULE_NAME: &str = "ConfigModule";

/// Token of the loaded application configuration
pub const APP_CONFIG_TOKEN: &str = "APP_CONFIG";

/// Token of the configuration-backed options factory
pub const CONFIG_OPTIONS_FACTORY_TOKEN: &str = "CONFIG_OPTIONS_FACTORY";

/// Token of the class-instantiated configuration options provider
pub const CONFIG_OPTIONS_FACTORY_CLASS: &str = "ConfigOptionsFactory";
