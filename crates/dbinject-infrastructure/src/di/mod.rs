//! Dependency Injection
//!
//! Deferred option resolution and the wiring that turns option specs into a
//! shared database connection.
//!
//! ```text
//! OptionSpec<Connect> ─┐                       ┌─ ProviderDescriptor (CONNECT_OPTIONS)
//! OptionSpec<Config>  ─┼─ resolver::resolve ───┼─ ProviderDescriptor (CONFIG_OPTIONS)
//! OptionSpec<Driver>  ─┘                       └─ ProviderDescriptor (DRIVER_OPTIONS)
//!          │                                              │
//!          └── imports::aggregate_imports ──► Module ◄────┘
//!                                               │
//!                                  ContainerBuilder::with_module
//!                                               │
//!                          Container::get(CONNECTION) ──► ConnectionManager::connect
//! ```
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`options`] | Static / deferred option specifications and option categories |
//! | [`resolver`] | Turns a spec into provider descriptors |
//! | [`imports`] | Merges the module imports declared by deferred specs |
//! | [`provider`] | Provider descriptors consumed by the container |
//! | [`instance`] | Type-erased resolved values |
//! | [`module`] | Registration units and reference-identity module refs |
//! | [`container`] | Async singleton container resolving providers in dependency order |
//! | [`database_module`] | Composition root for the database connection |

pub mod container;
pub mod database_module;
pub mod imports;
pub mod instance;
pub mod module;
pub mod options;
pub mod provider;
pub mod resolver;

pub use container::{Container, ContainerBuilder};
pub use database_module::DatabaseModule;
pub use imports::{DeclaresImports, aggregate_imports};
pub use instance::{Instance, ResolvedDeps};
pub use module::{Module, ModuleBuilder, ModuleRef};
pub use options::{
    AsyncOptions, ClassRef, Config, Connect, Driver, OptionCategory, OptionSource, OptionSpec,
};
pub use provider::ProviderDescriptor;
pub use resolver::{CategoryProviders, ClassProvider, resolve, resolve_optional};
