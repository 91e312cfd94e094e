//! Error extension utilities
//!
//! Context extension methods converting foreign errors into domain errors.

use std::fmt;

use dbinject_domain::error::{Error, Result};

/// Extension trait for adding context to errors
///
/// # Example
///
/// ```ignore
/// use dbinject_infrastructure::error_ext::ErrorContext;
///
/// let content = std::fs::read_to_string(&path)
///     .context(format!("Failed to read config file: {}", path.display()))?;
///
/// let pool = pool_options
///     .connect_with(options)
///     .await
///     .connect_context("postgres", "Failed to open pool")?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to a Result, converting the error to an I/O domain error
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Add context with lazy evaluation for expensive context creation
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;

    /// Add context for configuration operations
    fn config_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Add context for database connect operations
    fn connect_context<N, C>(self, client: N, context: C) -> Result<T>
    where
        N: Into<String>,
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|err| Error::io_with_source(format!("{context}: {err}"), err))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|err| Error::io_with_source(format!("{}: {err}", f()), err))
    }

    fn config_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|err| Error::configuration_with_source(format!("{context}: {err}"), err))
    }

    fn connect_context<N, C>(self, client: N, context: C) -> Result<T>
    where
        N: Into<String>,
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|err| Error::connect_with_source(client, format!("{context}: {err}"), err))
    }
}
