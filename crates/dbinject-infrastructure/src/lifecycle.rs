//! Connection Lifecycle Management
//!
//! [`ConnectionManager`] owns the resolved options and produces the shared
//! connection on first demand. Concurrent callers never trigger more than
//! one external connect per attempt.
//!
//! ## States
//!
//! ```text
//!                connect()                 success
//! Unconnected ─────────────► Connecting ──────────────► Connected
//!      ▲                         │                          │
//!      └──────── failure ────────┘          connect() returns the cached value
//! ```
//!
//! While `Connecting`, every caller awaits the same in-flight future and
//! observes the same success or the same error. A failure puts the manager
//! back in `Unconnected`, so the next call retries.
//!
//! The in-flight future settles the state itself before yielding its
//! result, so callers dropped mid-wait (e.g. under a timeout) never leave a
//! finished attempt behind in `Connecting`. An abandoned attempt stays in
//! flight and the next caller resumes it.
//!
//! ## Usage
//!
//! ```ignore
//! let manager = ConnectionManager::new(client, connect, config, driver);
//! let db = manager.connect().await?;
//! assert!(manager.is_connected().await);
//! ```

use std::fmt;
use std::sync::{Arc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use dbinject_domain::error::{Error, Result};
use dbinject_domain::{ConfigOptions, ConnectOptions, DatabaseClient, DriverOptions};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

type InFlight<T> = Shared<BoxFuture<'static, Result<T>>>;

enum Phase<T> {
    Unconnected,
    Connecting { attempt: u64, future: InFlight<T> },
    Connected(T),
}

/// Observable state of a [`ConnectionManager`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No connection and no attempt in progress
    Unconnected,
    /// An attempt is in progress
    Connecting,
    /// The connection is established and cached
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unconnected => "unconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        })
    }
}

/// Lazy singleton connection over a [`DatabaseClient`]
pub struct ConnectionManager<C: DatabaseClient> {
    client: Arc<C>,
    connect: Arc<ConnectOptions>,
    config: Arc<ConfigOptions>,
    driver: Arc<DriverOptions>,
    phase: Arc<Mutex<Phase<C::Connection>>>,
    attempts: AtomicU64,
}

impl<C: DatabaseClient> ConnectionManager<C> {
    /// Create a manager from fully resolved options
    pub fn new(
        client: Arc<C>,
        connect: ConnectOptions,
        config: ConfigOptions,
        driver: DriverOptions,
    ) -> Self {
        Self {
            client,
            connect: Arc::new(connect),
            config: Arc::new(config),
            driver: Arc::new(driver),
            phase: Arc::new(Mutex::new(Phase::Unconnected)),
            attempts: AtomicU64::new(0),
        }
    }

    /// Return the shared connection, establishing it if needed
    ///
    /// The state lock is only held to inspect or update the state, never
    /// while the client is connecting.
    pub async fn connect(&self) -> Result<C::Connection> {
        let (attempt, in_flight) = {
            let mut phase = self.phase.lock().await;
            match &*phase {
                Phase::Connected(connection) => return Ok(connection.clone()),
                Phase::Connecting { attempt, future } => (*attempt, future.clone()),
                Phase::Unconnected => {
                    let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    let future = self.start_attempt(attempt);
                    *phase = Phase::Connecting {
                        attempt,
                        future: future.clone(),
                    };
                    (attempt, future)
                }
            }
        };

        debug!(attempt = attempt, "Awaiting connect attempt");
        in_flight.await
    }

    fn start_attempt(&self, attempt: u64) -> InFlight<C::Connection> {
        let client = Arc::clone(&self.client);
        let connect = Arc::clone(&self.connect);
        let config = Arc::clone(&self.config);
        let driver = Arc::clone(&self.driver);
        let phase = Arc::downgrade(&self.phase);

        async move {
            let name = client.client_name().to_owned();
            info!(
                client = %name,
                attempt = attempt,
                host = %connect.host,
                port = connect.port,
                database = %connect.database,
                "Connecting to database"
            );
            let result = match client.connect(&connect, &config, &driver).await {
                Ok(connection) => {
                    info!(client = %name, attempt = attempt, "Database connection established");
                    Ok(connection)
                }
                Err(err) => {
                    warn!(client = %name, attempt = attempt, error = %err, "Database connection failed");
                    Err(Error::connect_failure(name, err))
                }
            };
            settle(&phase, attempt, &result).await;
            result
        }
        .boxed()
        .shared()
    }

    /// Current state
    pub async fn state(&self) -> ConnectionState {
        match &*self.phase.lock().await {
            Phase::Unconnected => ConnectionState::Unconnected,
            Phase::Connecting { .. } => ConnectionState::Connecting,
            Phase::Connected(_) => ConnectionState::Connected,
        }
    }

    /// Whether a connection is cached
    pub async fn is_connected(&self) -> bool {
        self.state().await == ConnectionState::Connected
    }

    /// The cached connection, without connecting
    pub async fn connection(&self) -> Option<C::Connection> {
        match &*self.phase.lock().await {
            Phase::Connected(connection) => Some(connection.clone()),
            _ => None,
        }
    }

    /// Number of connect attempts started so far
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// The wrapped client
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Resolved connect options
    pub fn connect_options(&self) -> &ConnectOptions {
        &self.connect
    }

    /// Resolved config options
    pub fn config_options(&self) -> &ConfigOptions {
        &self.config
    }

    /// Resolved driver options
    pub fn driver_options(&self) -> &DriverOptions {
        &self.driver
    }
}

/// Move `attempt` to its terminal state unless a newer attempt replaced it
async fn settle<T: Clone>(phase: &Weak<Mutex<Phase<T>>>, attempt: u64, result: &Result<T>) {
    let Some(phase) = phase.upgrade() else {
        return;
    };
    let mut phase = phase.lock().await;
    if matches!(&*phase, Phase::Connecting { attempt: a, .. } if *a == attempt) {
        *phase = match result {
            Ok(connection) => Phase::Connected(connection.clone()),
            Err(_) => Phase::Unconnected,
        };
    }
}

impl<C: DatabaseClient> fmt::Debug for ConnectionManager<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("client", &self.client.client_name())
            .field("connect", &self.connect)
            .field("attempts", &self.attempts())
            .finish_non_exhaustive()
    }
}
