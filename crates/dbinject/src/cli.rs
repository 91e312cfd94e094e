//! Command line interface
//!
//! Both commands load configuration the same way: defaults, then the TOML
//! file (`--config` or the first `dbinject.toml` found), then `DBINJECT__*`
//! environment variables.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dbinject_domain::{DatabaseClient, Error};
use dbinject_infrastructure::clients::{self, NULL_CLIENT_NAME, NullDatabaseClient};
use dbinject_infrastructure::config::{AppConfig, ConfigLoader, ConfigModule};
use dbinject_infrastructure::di::{AsyncOptions, OptionSpec};
use dbinject_infrastructure::logging::init_logging;
use dbinject_infrastructure::{ConnectionManager, ContainerBuilder, DatabaseModule};
use tracing::info;

/// Command line interface for dbinject
#[derive(Parser, Debug)]
#[command(name = "dbinject")]
#[command(about = "Resolve database options and verify the shared connection")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Compose the database module from configuration and connect once
    Check,
    /// Print the resolved options as JSON, password redacted
    ShowConfig,
}

/// Run a parsed command line
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli.config)?;
    match cli.command {
        Command::Check => {
            init_logging(&config.logging)?;
            check(config).await
        }
        Command::ShowConfig => show_config(&config),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<AppConfig, Error> {
    let loader = match path {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    };
    loader.load()
}

async fn check(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let client = config.database.client.clone();
    match client.as_str() {
        NULL_CLIENT_NAME => check_with(Arc::new(NullDatabaseClient::new()), config).await,
        #[cfg(feature = "postgres")]
        clients::POSTGRES_CLIENT_NAME => {
            check_with(Arc::new(clients::PostgresClient::new()), config).await
        }
        other => Err(Error::configuration(format!("Unknown database client: {other}")).into()),
    }
}

/// Wire the configuration through the deferred path and connect once
async fn check_with<C: DatabaseClient>(
    client: Arc<C>,
    config: AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = clients::connect_url(&config.database.connect);
    let config_module = ConfigModule::register(config).into_ref();

    let module = DatabaseModule::register_async(
        client,
        existing_spec(&config_module),
        Some(existing_spec(&config_module)),
        Some(existing_spec(&config_module)),
    );
    let container = ContainerBuilder::new().with_module(module)?.build()?;

    container.get(&DatabaseModule::connection_token()).await?;
    let manager = container
        .get_typed::<ConnectionManager<C>>(&DatabaseModule::manager_token())
        .await?;

    info!(url = %url, attempts = manager.attempts(), "Connection check succeeded");
    println!("{}: {} ({url})", manager.client().client_name(), manager.state().await);
    Ok(())
}

fn existing_spec<T>(config_module: &dbinject_infrastructure::ModuleRef) -> OptionSpec<T> {
    AsyncOptions::use_existing(ConfigModule::factory_token())
        .with_imports([config_module.clone()])
        .into()
}

fn show_config(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let database = &config.database;
    let rendered = serde_json::json!({
        "client": database.client,
        "url": clients::connect_url(&database.connect),
        "connect": database.connect.redacted(),
        "config": database.config,
        "driver": database.driver,
    });
    println!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(())
}
