//! PostgreSQL client adapter
//!
//! Opens a sqlx connection pool from the resolved options. Pool sizing and
//! timeouts come from [`ConnectOptions`]; the search path comes from the
//! driver `schema` list, or the config `allowed_schemas` list when the
//! driver does not name one.

use std::sync::Arc;

use async_trait::async_trait;
use dbinject_domain::error::{Error, Result};
use dbinject_domain::{ConfigOptions, ConnectOptions, DatabaseClient, DriverOptions};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use tracing::debug;

use super::{POSTGRES_CLIENT_NAME, connect_url};
use crate::error_ext::ErrorContext;

/// Connection produced by [`PostgresClient`]
#[derive(Debug, Clone)]
pub struct PgDatabase {
    pool: PgPool,
    config: Arc<ConfigOptions>,
    driver: Arc<DriverOptions>,
}

impl PgDatabase {
    /// The underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Config options the pool was opened with
    pub fn config(&self) -> &ConfigOptions {
        &self.config
    }

    /// Driver options the pool was opened with
    pub fn driver(&self) -> &DriverOptions {
        &self.driver
    }
}

/// sqlx-backed PostgreSQL client
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresClient;

impl PostgresClient {
    /// Create a client
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    type Connection = PgDatabase;

    fn client_name(&self) -> &str {
        POSTGRES_CLIENT_NAME
    }

    async fn connect(
        &self,
        connect: &ConnectOptions,
        config: &ConfigOptions,
        driver: &DriverOptions,
    ) -> Result<PgDatabase> {
        let options = pg_connect_options(connect, config, driver)?;
        let pool = pool_options(connect)
            .connect_with(options)
            .await
            .connect_context(
                POSTGRES_CLIENT_NAME,
                format!("Failed to open pool for {}", connect_url(connect)),
            )?;

        Ok(PgDatabase {
            pool,
            config: Arc::new(config.clone()),
            driver: Arc::new(driver.clone()),
        })
    }
}

fn pg_connect_options(
    connect: &ConnectOptions,
    config: &ConfigOptions,
    driver: &DriverOptions,
) -> Result<PgConnectOptions> {
    if let Some(encoding) = connect.client_encoding.as_deref() {
        let normalized = encoding.replace('-', "");
        if !normalized.eq_ignore_ascii_case("utf8") {
            return Err(Error::connect(
                POSTGRES_CLIENT_NAME,
                format!("Unsupported client encoding: {encoding}"),
            ));
        }
    }

    let mut options = PgConnectOptions::new()
        .host(&connect.host)
        .port(connect.port)
        .database(&connect.database)
        .username(&connect.user);

    if !connect.password.is_empty() {
        options = options.password(&connect.password);
    }
    if let Some(ssl) = connect.ssl {
        options = options.ssl_mode(if ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Disable
        });
    }
    if let Some(name) = connect.effective_application_name() {
        options = options.application_name(name);
    }

    let mut server_options = Vec::new();
    let schemas = driver.schema.as_ref().or(config.allowed_schemas.as_ref());
    if let Some(schemas) = schemas.filter(|schemas| !schemas.is_empty()) {
        server_options.push(("search_path", schemas.join(",")));
    }
    if let Some(timeout) = connect.query_timeout {
        server_options.push(("statement_timeout", timeout.to_string()));
    }
    if !server_options.is_empty() {
        options = options.options(server_options);
    }

    if connect.binary.is_some() || connect.keep_alive.is_some() {
        debug!("binary and keep_alive are managed by sqlx and ignored");
    }

    Ok(options)
}

fn pool_options(connect: &ConnectOptions) -> PgPoolOptions {
    let mut pool = PgPoolOptions::new();
    if let Some(max) = connect.max_connections() {
        pool = pool.max_connections(max);
    }
    if let Some(min) = connect.min {
        pool = pool.min_connections(min);
    }
    if let Some(idle) = connect.idle_timeout() {
        pool = pool.idle_timeout(idle);
    }
    pool
}
