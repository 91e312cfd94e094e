//! Configuration
//!
//! Application configuration loaded through Figment, and an
//! [`OptionsFactory`](dbinject_domain::OptionsFactory) that serves the
//! loaded database settings to the deferred option protocol.

pub mod loader;
pub mod options_factory;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use options_factory::{ConfigModule, ConfigOptionsFactory};
pub use types::{AppConfig, DatabaseSettings, LoggingConfig};
