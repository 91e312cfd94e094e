//! Database client adapters
//!
//! | Adapter | Feature | Connection |
//! |---------|---------|------------|
//! | [`NullDatabaseClient`] | always | [`NullConnection`], no I/O |
//! | `PostgresClient` | `postgres` | `PgDatabase` wrapping a sqlx pool |

mod null;
#[cfg(feature = "postgres")]
mod postgres;

pub use null::{NullConnection, NullDatabaseClient};
#[cfg(feature = "postgres")]
pub use postgres::{PgDatabase, PostgresClient};

use dbinject_domain::ConnectOptions;

/// Client name of the null adapter
pub const NULL_CLIENT_NAME: &str = "null";

/// Client name of the PostgreSQL adapter
pub const POSTGRES_CLIENT_NAME: &str = "postgres";

/// Connection URL for logs and diagnostics, password redacted
pub fn connect_url(options: &ConnectOptions) -> String {
    let redacted = options.redacted();
    let credentials = if redacted.password.is_empty() {
        redacted.user
    } else {
        format!("{}:{}", redacted.user, redacted.password)
    };
    format!(
        "postgres://{credentials}@{}:{}/{}",
        redacted.host, redacted.port, redacted.database
    )
}
