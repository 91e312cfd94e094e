//! Domain layer constants
//!
//! Names used by tokens, capability methods and the default connect options.

// ============================================================================
// TOKEN NAMES
// ============================================================================

/// Token name for the resolved connect options
pub const CONNECT_OPTIONS_TOKEN: &str = "DBINJECT_CONNECT_OPTIONS";

/// Token name for the resolved config options
pub const CONFIG_OPTIONS_TOKEN: &str = "DBINJECT_CONFIG_OPTIONS";

/// Token name for the resolved driver options
pub const DRIVER_OPTIONS_TOKEN: &str = "DBINJECT_DRIVER_OPTIONS";

/// Token name for the shared connection
pub const CONNECTION_TOKEN: &str = "DBINJECT_CONNECTION";

/// Token name for the connection lifecycle manager
pub const CONNECTION_MANAGER_TOKEN: &str = "DBINJECT_CONNECTION_MANAGER";

// ============================================================================
// CAPABILITY METHOD NAMES
// ============================================================================

/// Capability method supplying connect options
pub const CREATE_CONNECT_OPTIONS: &str = "create_connect_options";

/// Capability method supplying config options
pub const CREATE_CONFIG_OPTIONS: &str = "create_config_options";

/// Capability method supplying driver options
pub const CREATE_DRIVER_OPTIONS: &str = "create_driver_options";

// ============================================================================
// CONNECT DEFAULTS
// ============================================================================

/// Default database host
pub const DEFAULT_HOST: &str = "localhost";

/// Default PostgreSQL port
pub const DEFAULT_PORT: u16 = 5432;

/// Default database and user name
pub const DEFAULT_DATABASE: &str = "postgres";

/// Placeholder shown instead of secrets in logs and debug output
pub const REDACTED: &str = "***";
