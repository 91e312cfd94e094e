//! Null database client
//!
//! Performs no I/O. Connecting yields a handle describing what would have
//! been connected to, which makes the adapter handy for dry runs.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dbinject_domain::error::Result;
use dbinject_domain::{ConfigOptions, ConnectOptions, DatabaseClient, DriverOptions};
use serde::Serialize;
use tracing::debug;

use super::{NULL_CLIENT_NAME, connect_url};

/// Handle returned by [`NullDatabaseClient`]
#[derive(Debug, Clone, Serialize)]
pub struct NullConnection {
    /// Sequence number of the connect call that produced this handle
    pub id: u64,
    /// Redacted connection URL
    pub url: String,
    /// Config options the connection was opened with
    pub config: ConfigOptions,
    /// Driver options the connection was opened with
    pub driver: DriverOptions,
}

/// Client that never touches the network
#[derive(Debug, Default)]
pub struct NullDatabaseClient {
    connects: AtomicU64,
}

impl NullDatabaseClient {
    /// Create a client
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of connect calls so far
    pub fn connect_count(&self) -> u64 {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseClient for NullDatabaseClient {
    type Connection = NullConnection;

    fn client_name(&self) -> &str {
        NULL_CLIENT_NAME
    }

    async fn connect(
        &self,
        connect: &ConnectOptions,
        config: &ConfigOptions,
        driver: &DriverOptions,
    ) -> Result<NullConnection> {
        let id = self.connects.fetch_add(1, Ordering::SeqCst) + 1;
        let url = connect_url(connect);
        debug!(id = id, url = %url, "Null connection opened");
        Ok(NullConnection {
            id,
            url,
            config: config.clone(),
            driver: driver.clone(),
        })
    }
}
