//! Option value objects
//!
//! The three configuration categories handed to the database client:
//! connect (network and credentials), config (client behavior) and driver
//! (low-level tuning).

mod config;
mod connect;
mod driver;

pub use config::ConfigOptions;
pub use connect::ConnectOptions;
pub use driver::DriverOptions;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{CREATE_CONFIG_OPTIONS, CREATE_CONNECT_OPTIONS, CREATE_DRIVER_OPTIONS};
use crate::tokens::CategoryToken;

/// Option category discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// Connect options (required)
    Connect,
    /// Config options (optional)
    Config,
    /// Driver options (optional)
    Driver,
}

impl OptionKind {
    /// Capability method an options provider implements for this category
    pub fn method_name(self) -> &'static str {
        match self {
            Self::Connect => CREATE_CONNECT_OPTIONS,
            Self::Config => CREATE_CONFIG_OPTIONS,
            Self::Driver => CREATE_DRIVER_OPTIONS,
        }
    }

    /// Token under which the resolved value is registered
    pub fn token(self) -> CategoryToken {
        match self {
            Self::Connect => CategoryToken::ConnectOptions,
            Self::Config => CategoryToken::ConfigOptions,
            Self::Driver => CategoryToken::DriverOptions,
        }
    }

    /// Whether a value must be supplied for this category
    pub fn is_required(self) -> bool {
        matches!(self, Self::Connect)
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::Config => "config",
            Self::Driver => "driver",
        })
    }
}
