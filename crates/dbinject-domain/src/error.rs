//! Error handling types
//!
//! Errors are `Clone` so that a single failed connection attempt can be
//! handed to every caller that was waiting on it. Underlying causes are
//! therefore kept behind an `Arc` instead of a `Box`.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::value_objects::OptionKind;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Shareable underlying cause of an error
pub type ErrorSource = Arc<dyn std::error::Error + Send + Sync>;

/// Main error type for dbinject
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// An options provider lacks the capability method for a category
    #[error(
        "Options provider '{provider}' does not implement {} required for {category} options",
        .category.method_name()
    )]
    MissingCapability {
        /// Option category being resolved
        category: OptionKind,
        /// Name of the provider that was asked
        provider: String,
    },

    /// A factory or capability method failed while producing a value
    #[error("Failed to resolve {token}: {message}")]
    Resolution {
        /// Token whose value could not be produced
        token: String,
        /// Description of the failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<ErrorSource>,
    },

    /// The external database client failed to connect
    #[error("Database connection failed ({client}): {message}")]
    Connect {
        /// Name of the database client
        client: String,
        /// Description of the failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<ErrorSource>,
    },

    /// No provider is registered for a token
    #[error("No provider registered for {token}")]
    ProviderNotFound {
        /// The missing token
        token: String,
    },

    /// A provider was registered twice for the same token
    #[error("Provider already registered for {token}")]
    DuplicateProvider {
        /// The duplicated token
        token: String,
    },

    /// Providers depend on each other in a loop
    #[error("Dependency cycle detected: {path}")]
    DependencyCycle {
        /// The cycle rendered as `A -> B -> A`
        path: String,
    },

    /// A resolved value does not have the requested type
    #[error("Provider {token} does not produce a value of type {expected}")]
    DependencyType {
        /// Token that was downcast
        token: String,
        /// Requested type name
        expected: &'static str,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<ErrorSource>,
    },

    /// I/O operation error
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<ErrorSource>,
    },
}

impl Error {
    /// Create a missing capability error
    pub fn missing_capability<S: Into<String>>(category: OptionKind, provider: S) -> Self {
        Self::MissingCapability {
            category,
            provider: provider.into(),
        }
    }

    /// Create a resolution error without a source
    pub fn resolution_message<T: fmt::Display, S: Into<String>>(token: T, message: S) -> Self {
        Self::Resolution {
            token: token.to_string(),
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a failure raised while producing the value for `token`
    ///
    /// Resolution and missing-capability errors pass through unchanged so
    /// the innermost failing token stays visible.
    pub fn resolution<T: fmt::Display>(token: T, err: Self) -> Self {
        match err {
            err @ (Self::Resolution { .. } | Self::MissingCapability { .. }) => err,
            other => Self::Resolution {
                token: token.to_string(),
                message: other.to_string(),
                source: Some(Arc::new(other)),
            },
        }
    }

    /// Create a connect error without a source
    pub fn connect<C: Into<String>, S: Into<String>>(client: C, message: S) -> Self {
        Self::Connect {
            client: client.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a connect error with source
    pub fn connect_with_source<C, S, E>(client: C, message: S, source: E) -> Self
    where
        C: Into<String>,
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connect {
            client: client.into(),
            message: message.into(),
            source: Some(Arc::new(source)),
        }
    }

    /// Wrap a failure returned by a database client
    ///
    /// Errors that already are connect failures pass through unchanged.
    pub fn connect_failure<C: Into<String>>(client: C, err: Self) -> Self {
        match err {
            err @ Self::Connect { .. } => err,
            other => Self::Connect {
                client: client.into(),
                message: other.to_string(),
                source: Some(Arc::new(other)),
            },
        }
    }

    /// Create a provider not found error
    pub fn provider_not_found<T: fmt::Display>(token: T) -> Self {
        Self::ProviderNotFound {
            token: token.to_string(),
        }
    }

    /// Create a duplicate provider error
    pub fn duplicate_provider<T: fmt::Display>(token: T) -> Self {
        Self::DuplicateProvider {
            token: token.to_string(),
        }
    }

    /// Create a dependency type error
    pub fn dependency_type<T: fmt::Display>(token: T, expected: &'static str) -> Self {
        Self::DependencyType {
            token: token.to_string(),
            expected,
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Configuration {
            message: message.into(),
            source: Some(Arc::new(source)),
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Io {
            message: message.into(),
            source: Some(Arc::new(source)),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::io_with_source(err.to_string(), err)
    }
}
