//! Database Client Port
//!
//! The single point of contact with the wrapped client library.

use async_trait::async_trait;

use crate::error::Result;
use crate::value_objects::{ConfigOptions, ConnectOptions, DriverOptions};

/// External client able to open a connection from resolved options
///
/// Implementations may block on network I/O and may fail; failures are
/// surfaced unchanged to whoever requested the connection.
#[async_trait]
pub trait DatabaseClient: Send + Sync + 'static {
    /// Shared connection handle produced by the client
    type Connection: Clone + Send + Sync + 'static;

    /// Name used in diagnostics
    fn client_name(&self) -> &str;

    /// Open a connection
    async fn connect(
        &self,
        connect: &ConnectOptions,
        config: &ConfigOptions,
        driver: &DriverOptions,
    ) -> Result<Self::Connection>;
}
