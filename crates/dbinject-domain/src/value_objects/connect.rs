//! Connect options value object
//!
//! Network, credential and pooling parameters for opening a PostgreSQL
//! connection.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_PORT, REDACTED};

/// Connection parameters for the database client
///
/// `Debug` never prints the password.
///
/// # Example
///
/// ```
/// use dbinject_domain::ConnectOptions;
///
/// let options = ConnectOptions::new("db", 5432, "app", "u", "p")
///     .with_ssl(true)
///     .with_pool(2, 10);
/// assert_eq!(options.max, Some(10));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectOptions {
    /// Server name or IP address
    pub host: String,
    /// Server port number
    pub port: u16,
    /// Database name
    pub database: String,
    /// User name
    pub user: String,
    /// User password
    pub password: String,
    /// Use SSL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl: Option<bool>,
    /// Binary result mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<bool>,
    /// Client encoding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_encoding: Option<String>,
    /// Application name reported to the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,
    /// Application name used when `application_name` is not set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_application_name: Option<String>,
    /// Lifespan for unused pooled connections, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_timeout_millis: Option<u64>,
    /// Connection pool size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_size: Option<u32>,
    /// Maximum size of the connection pool
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
    /// Minimum size of the connection pool
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    /// Query execution timeout, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_timeout: Option<u64>,
    /// Keep TCP alive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<bool>,
}

impl ConnectOptions {
    /// Create connect options with the mandatory fields
    pub fn new<H, D, U, P>(host: H, port: u16, database: D, user: U, password: P) -> Self
    where
        H: Into<String>,
        D: Into<String>,
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            host: host.into(),
            port,
            database: database.into(),
            user: user.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Enable or disable SSL
    pub fn with_ssl(mut self, ssl: bool) -> Self {
        self.ssl = Some(ssl);
        self
    }

    /// Set pool bounds
    pub fn with_pool(mut self, min: u32, max: u32) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Set the application name
    pub fn with_application_name<S: Into<String>>(mut self, name: S) -> Self {
        self.application_name = Some(name.into());
        self
    }

    /// Idle timeout as a duration
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_millis.map(Duration::from_millis)
    }

    /// Query timeout as a duration
    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout.map(Duration::from_millis)
    }

    /// Effective application name, falling back when unset
    pub fn effective_application_name(&self) -> Option<&str> {
        self.application_name
            .as_deref()
            .or(self.fallback_application_name.as_deref())
    }

    /// Upper bound for the pool, preferring `max` over `pool_size`
    pub fn max_connections(&self) -> Option<u32> {
        self.max.or(self.pool_size)
    }

    /// A copy safe for display, with the password replaced
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.password.is_empty() {
            copy.password = REDACTED.to_owned();
        }
        copy
    }
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            database: DEFAULT_DATABASE.to_owned(),
            user: DEFAULT_DATABASE.to_owned(),
            password: String::new(),
            ssl: None,
            binary: None,
            client_encoding: None,
            application_name: None,
            fallback_application_name: None,
            idle_timeout_millis: None,
            pool_size: None,
            max: None,
            min: None,
            query_timeout: None,
            keep_alive: None,
        }
    }
}

impl fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &REDACTED)
            .field("ssl", &self.ssl)
            .field("application_name", &self.effective_application_name())
            .field("pool_size", &self.pool_size)
            .field("max", &self.max)
            .field("min", &self.min)
            .field("idle_timeout_millis", &self.idle_timeout_millis)
            .field("query_timeout", &self.query_timeout)
            .finish_non_exhaustive()
    }
}
