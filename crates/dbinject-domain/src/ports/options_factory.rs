//! Options Factory Port
//!
//! A provider registered in the container that knows how to produce option
//! values. Connect options are mandatory; the config and driver capabilities
//! are optional and report absence by returning `None`.

use async_trait::async_trait;

use crate::error::Result;
use crate::value_objects::{ConfigOptions, ConnectOptions, DriverOptions};

/// Capability interface for deferred option providers
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use dbinject_domain::{ConnectOptions, OptionsFactory, Result};
///
/// struct EnvOptions;
///
/// #[async_trait]
/// impl OptionsFactory for EnvOptions {
///     fn provider_name(&self) -> &str {
///         "env"
///     }
///
///     async fn create_connect_options(&self) -> Result<ConnectOptions> {
///         Ok(ConnectOptions::new("db", 5432, "app", "u", "p"))
///     }
/// }
/// ```
#[async_trait]
pub trait OptionsFactory: Send + Sync {
    /// Name used in diagnostics
    fn provider_name(&self) -> &str;

    /// Produce connect options
    async fn create_connect_options(&self) -> Result<ConnectOptions>;

    /// Produce config options, or `None` when not supported
    async fn create_config_options(&self) -> Option<Result<ConfigOptions>> {
        None
    }

    /// Produce driver options, or `None` when not supported
    async fn create_driver_options(&self) -> Option<Result<DriverOptions>> {
        None
    }
}
