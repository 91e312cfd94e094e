//! Type-erased resolved values
//!
//! The container stores heterogeneous values; an [`Instance`] keeps the value
//! behind `Arc<dyn Any>` and recovers the concrete type with a checked
//! downcast.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use dbinject_domain::error::{Error, Result};
use dbinject_domain::Token;

/// A resolved provider value
#[derive(Clone)]
pub struct Instance {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Instance {
    /// Wrap a value
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wrap an already shared value without re-allocating
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            value,
            type_name: type_name::<T>(),
        }
    }

    /// Recover the concrete value, if it has type `T`
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.value).downcast::<T>().ok()
    }

    /// Name of the stored type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.type_name)
            .finish()
    }
}

/// Resolved dependencies handed to a provider, in declaration order
#[derive(Debug, Clone, Default)]
pub struct ResolvedDeps {
    entries: Vec<(Token, Instance)>,
}

impl ResolvedDeps {
    /// Create from resolved `(token, instance)` pairs
    pub fn new(entries: Vec<(Token, Instance)>) -> Self {
        Self { entries }
    }

    /// Number of dependencies
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the provider declared no dependencies
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tokens in declaration order
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.entries.iter().map(|(token, _)| token)
    }

    /// Typed value of the dependency at `index`
    pub fn get<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>> {
        let (token, instance) = self
            .entries
            .get(index)
            .ok_or_else(|| Error::provider_not_found(format!("dependency #{index}")))?;
        instance
            .downcast::<T>()
            .ok_or_else(|| Error::dependency_type(token, type_name::<T>()))
    }

    /// Typed value of the dependency registered under `token`
    pub fn by_token<T: Any + Send + Sync>(&self, token: &Token) -> Result<Arc<T>> {
        let index = self
            .entries
            .iter()
            .position(|(candidate, _)| candidate == token)
            .ok_or_else(|| Error::provider_not_found(token))?;
        self.get(index)
    }
}
