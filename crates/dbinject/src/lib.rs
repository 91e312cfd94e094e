//! # dbinject
//!
//! Resolves database options from static values or deferred providers and
//! hands them to a database client, sharing one lazily opened connection.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use dbinject::infrastructure::clients::NullDatabaseClient;
//! use dbinject::infrastructure::{ContainerBuilder, DatabaseModule};
//! use dbinject::ConnectOptions;
//!
//! let module = DatabaseModule::register(
//!     Arc::new(NullDatabaseClient::new()),
//!     ConnectOptions::new("localhost", 5432, "app", "app", "secret"),
//!     None,
//!     None,
//! );
//! let container = ContainerBuilder::new().with_module(module)?.build()?;
//! let connection = container.get(&DatabaseModule::connection_token()).await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Option value objects, tokens, ports and errors
//! - `infrastructure` - Resolver, container, lifecycle, configuration and client adapters
//! - `cli` - The `dbinject` command line

pub mod cli;

/// Domain layer - option value objects, tokens, ports and errors
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use dbinject_domain::*;
}

/// Infrastructure layer - DI, lifecycle, config and clients
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use dbinject_infrastructure::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::*;
