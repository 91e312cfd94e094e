//! Database module
//!
//! Composition root tying option specs, the resolver and the connection
//! lifecycle together. The produced [`Module`] exposes:
//!
//! | Token | Value |
//! |-------|-------|
//! | `ConnectOptions` | [`ConnectOptions`] |
//! | `ConfigOptions` | [`ConfigOptions`] |
//! | `DriverOptions` | [`DriverOptions`] |
//! | `ConnectionManager` | [`ConnectionManager<C>`] |
//! | `Connection` | `C::Connection` |
//!
//! plus any class-referenced options providers, and imports the union of
//! the modules required by the deferred specs. The same [`ClassRef`] used
//! by several categories is instantiated once; two different classes under
//! one token make [`ContainerBuilder::with_module`] fail with
//! `DuplicateProvider`.
//!
//! [`ContainerBuilder::with_module`]: crate::di::ContainerBuilder::with_module

use std::sync::Arc;

use dbinject_domain::error::Error;
use dbinject_domain::{
    CategoryToken, ConfigOptions, ConnectOptions, DatabaseClient, DriverOptions, Token,
};
use tracing::{debug, info, warn};

use crate::constants::DATABASE_MODULE_NAME;
use crate::di::imports::{DeclaresImports, aggregate_imports};
use crate::di::instance::{Instance, ResolvedDeps};
use crate::di::module::Module;
use crate::di::options::{ClassRef, Config, Connect, Driver, OptionCategory, OptionSpec};
use crate::di::provider::ProviderDescriptor;
use crate::di::resolver::{resolve, resolve_optional};
use crate::lifecycle::ConnectionManager;

/// Builds the database module
#[derive(Debug, Clone, Copy)]
pub struct DatabaseModule;

impl DatabaseModule {
    /// Module from values known at composition time
    ///
    /// Absent config or driver options fall back to their defaults.
    pub fn register<C: DatabaseClient>(
        client: Arc<C>,
        connect: ConnectOptions,
        config: Option<ConfigOptions>,
        driver: Option<DriverOptions>,
    ) -> Module {
        Self::register_async(
            client,
            OptionSpec::value(connect),
            config.map(OptionSpec::value),
            driver.map(OptionSpec::value),
        )
    }

    /// Module from any mix of static and deferred specs
    pub fn register_async<C: DatabaseClient>(
        client: Arc<C>,
        connect: OptionSpec<ConnectOptions>,
        config: Option<OptionSpec<ConfigOptions>>,
        driver: Option<OptionSpec<DriverOptions>>,
    ) -> Module {
        let imports = aggregate_imports([
            Some(&connect as &dyn DeclaresImports),
            config.as_ref().map(|spec| spec as &dyn DeclaresImports),
            driver.as_ref().map(|spec| spec as &dyn DeclaresImports),
        ]);

        let categories = [
            resolve::<Connect>(connect),
            resolve_optional::<Config>(config),
            resolve_optional::<Driver>(driver),
        ];

        // One class may back several categories; a different class under
        // the same token is kept so the container rejects the duplicate.
        let mut classes: Vec<ClassRef> = Vec::new();
        let mut providers = Vec::new();
        for category in categories {
            if let Some(class) = category.class {
                if classes.iter().any(|seen| seen.same(&class.reference)) {
                    debug!(class = %class.reference.token(), "Class provider shared between categories");
                } else {
                    if classes.iter().any(|seen| seen.token() == class.reference.token()) {
                        warn!(class = %class.reference.token(), "Conflicting class providers share a token");
                    }
                    classes.push(class.reference);
                    providers.push(class.descriptor);
                }
            }
            providers.push(category.options);
        }
        providers.push(manager_descriptor(client));
        providers.push(connection_descriptor::<C>());

        info!(
            module = DATABASE_MODULE_NAME,
            providers = providers.len(),
            imports = imports.len(),
            "Database module composed"
        );

        Module::builder(DATABASE_MODULE_NAME)
            .imports(imports)
            .providers(providers)
            .build()
    }

    /// Token of the shared connection
    pub fn connection_token() -> Token {
        CategoryToken::Connection.into()
    }

    /// Token of the connection manager
    pub fn manager_token() -> Token {
        CategoryToken::ConnectionManager.into()
    }
}

fn manager_descriptor<C: DatabaseClient>(client: Arc<C>) -> ProviderDescriptor {
    let dependencies = vec![Connect::token(), Config::token(), Driver::token()];
    ProviderDescriptor::new(
        DatabaseModule::manager_token(),
        dependencies,
        move |deps: ResolvedDeps| {
            let client = Arc::clone(&client);
            async move {
                let connect = deps.get::<ConnectOptions>(0)?;
                let config = deps.get::<ConfigOptions>(1)?;
                let driver = deps.get::<DriverOptions>(2)?;
                let manager = ConnectionManager::new(
                    client,
                    ConnectOptions::clone(&connect),
                    ConfigOptions::clone(&config),
                    DriverOptions::clone(&driver),
                );
                Ok::<_, Error>(Instance::new(manager))
            }
        },
    )
}

fn connection_descriptor<C: DatabaseClient>() -> ProviderDescriptor {
    ProviderDescriptor::new(
        DatabaseModule::connection_token(),
        vec![DatabaseModule::manager_token()],
        |deps: ResolvedDeps| async move {
            let manager = deps.get::<ConnectionManager<C>>(0)?;
            let connection = manager.connect().await?;
            Ok::<_, Error>(Instance::new(connection))
        },
    )
    // The manager caches the connection and shares in-flight attempts
    .transient()
}
