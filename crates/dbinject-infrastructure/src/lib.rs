//! # Infrastructure Layer
//!
//! Option resolution, dependency wiring and the connection lifecycle.
//!
//! ## Module Categories
//!
//! ### Configuration & DI
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment configuration and the config-backed options factory |
//! | [`di`] | Option specs, resolver, import aggregation, container, database module |
//! | [`constants`] | Centralized infrastructure constants |
//!
//! ### Connections
//! | Module | Description |
//! |--------|-------------|
//! | [`lifecycle`] | Lazy singleton connection manager |
//! | [`clients`] | Database client adapters (null, PostgreSQL) |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |

pub mod clients;
pub mod config;
pub mod constants;
pub mod di;
pub mod error_ext;
pub mod lifecycle;
pub mod logging;

// Re-export commonly used types
pub use di::{Container, ContainerBuilder, DatabaseModule, Module, ModuleRef, OptionSpec};
pub use error_ext::ErrorContext;
pub use lifecycle::{ConnectionManager, ConnectionState};
