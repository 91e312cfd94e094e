//! # dbinject Domain Layer
//!
//! Pure types shared by every dbinject crate. Nothing in here performs I/O.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error taxonomy for resolution, injection and connection failures |
//! | [`value_objects`] | Connect, config and driver option value objects |
//! | [`tokens`] | Identity tokens used for dependency wiring |
//! | [`ports`] | Options-factory capability interface and database client port |
//! | [`constants`] | Token names and capability method names |

pub mod constants;
pub mod error;
pub mod ports;
pub mod tokens;
pub mod value_objects;

pub use error::{Error, Result};
pub use ports::{DatabaseClient, OptionsFactory};
pub use tokens::{CategoryToken, Token};
pub use value_objects::{ConfigOptions, ConnectOptions, DriverOptions, OptionKind};
