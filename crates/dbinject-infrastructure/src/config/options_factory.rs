//! Configuration-backed options provider
//!
//! Serves the `[database]` section of a loaded [`AppConfig`] through the
//! [`OptionsFactory`] capabilities, so a configuration file can feed the
//! deferred option protocol.
//!
//! ```ignore
//! let config_module = ConfigModule::register(ConfigLoader::new().load()?).into_ref();
//! let connect = AsyncOptions::use_existing(ConfigModule::factory_token())
//!     .with_imports([config_module]);
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use dbinject_domain::error::{Error, Result};
use dbinject_domain::{ConfigOptions, ConnectOptions, DriverOptions, OptionsFactory, Token};
use tracing::debug;

use crate::config::AppConfig;
use crate::config::loader::validate_connect_options;
use crate::constants::{
    APP_CONFIG_TOKEN, CONFIG_MODULE_NAME, CONFIG_OPTIONS_FACTORY_CLASS, CONFIG_OPTIONS_FACTORY_TOKEN,
};
use crate::di::{ClassRef, Instance, Module, ProviderDescriptor};

/// Provider name reported in diagnostics
const PROVIDER_NAME: &str = "config";

/// Options provider reading from application configuration
#[derive(Debug, Clone)]
pub struct ConfigOptionsFactory {
    config: Arc<AppConfig>,
}

impl ConfigOptionsFactory {
    /// Create from a loaded configuration
    pub fn new(config: AppConfig) -> Self {
        Self::from_shared(Arc::new(config))
    }

    /// Create from a shared configuration
    pub fn from_shared(config: Arc<AppConfig>) -> Self {
        Self { config }
    }

    /// Class reference that instantiates this provider from `config`
    pub fn class_ref(config: AppConfig) -> ClassRef {
        let shared = Arc::new(config);
        ClassRef::of(Token::named(CONFIG_OPTIONS_FACTORY_CLASS), move || {
            Self::from_shared(Arc::clone(&shared))
        })
    }
}

#[async_trait]
impl OptionsFactory for ConfigOptionsFactory {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn create_connect_options(&self) -> Result<ConnectOptions> {
        let connect = &self.config.database.connect;
        validate_connect_options(connect)?;
        debug!(host = %connect.host, database = %connect.database, "Connect options read from configuration");
        Ok(connect.clone())
    }

    async fn create_config_options(&self) -> Option<Result<ConfigOptions>> {
        Some(Ok(self.config.database.config.clone()))
    }

    async fn create_driver_options(&self) -> Option<Result<DriverOptions>> {
        Some(Ok(self.config.database.driver.clone()))
    }
}

/// Module exporting the loaded configuration and its options provider
#[derive(Debug, Clone, Copy)]
pub struct ConfigModule;

impl ConfigModule {
    /// Build the module
    ///
    /// Registers the configuration under `APP_CONFIG` and a
    /// [`ConfigOptionsFactory`] under [`ConfigModule::factory_token`].
    pub fn register(config: AppConfig) -> Module {
        let factory = ProviderDescriptor::new(
            Self::factory_token(),
            vec![Self::config_token()],
            |deps| async move {
                let config = deps.get::<AppConfig>(0)?;
                let provider: Arc<dyn OptionsFactory> =
                    Arc::new(ConfigOptionsFactory::from_shared(config));
                Ok::<_, Error>(Instance::new(provider))
            },
        );

        Module::builder(CONFIG_MODULE_NAME)
            .provider(ProviderDescriptor::value(Self::config_token(), config))
            .provider(factory)
            .build()
    }

    /// Token of the loaded [`AppConfig`]
    pub fn config_token() -> Token {
        Token::named(APP_CONFIG_TOKEN)
    }

    /// Token of the registered options provider
    pub fn factory_token() -> Token {
        Token::named(CONFIG_OPTIONS_FACTORY_TOKEN)
    }
}
