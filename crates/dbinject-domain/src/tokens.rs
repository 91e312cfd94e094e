//! Identity tokens for dependency wiring
//!
//! Tokens carry no behavior. The container keys providers by [`Token`] and a
//! dependency reference is simply the token of an already-registered provider.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_OPTIONS_TOKEN, CONNECTION_MANAGER_TOKEN, CONNECTION_TOKEN, CONNECT_OPTIONS_TOKEN,
    DRIVER_OPTIONS_TOKEN,
};

/// Well-known tokens owned by the database module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryToken {
    /// Resolved connect options
    ConnectOptions,
    /// Resolved config options
    ConfigOptions,
    /// Resolved driver options
    DriverOptions,
    /// The shared connection
    Connection,
    /// The connection lifecycle manager
    ConnectionManager,
}

impl CategoryToken {
    /// Stable name of the token
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConnectOptions => CONNECT_OPTIONS_TOKEN,
            Self::ConfigOptions => CONFIG_OPTIONS_TOKEN,
            Self::DriverOptions => DRIVER_OPTIONS_TOKEN,
            Self::Connection => CONNECTION_TOKEN,
            Self::ConnectionManager => CONNECTION_MANAGER_TOKEN,
        }
    }
}

impl fmt::Display for CategoryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider identity inside a container
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    /// One of the database module's own tokens
    Category(CategoryToken),
    /// Any other provider, identified by name
    Named(String),
}

impl Token {
    /// Create a named token
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self::Named(name.into())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(category) => category.fmt(f),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl From<CategoryToken> for Token {
    fn from(category: CategoryToken) -> Self {
        Self::Category(category)
    }
}

impl From<&str> for Token {
    fn from(name: &str) -> Self {
        Self::Named(name.to_owned())
    }
}

impl From<String> for Token {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}
