//! Provider descriptors
//!
//! A [`ProviderDescriptor`] is the unit the container understands: a token,
//! the tokens it depends on, and a function that produces the value once
//! those dependencies are resolved. Sync and async producers share the same
//! boxed-future signature.
//!
//! Descriptors are singletons unless marked [`ProviderDescriptor::transient`];
//! a transient producer runs on every request and is expected to do its own
//! caching.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use dbinject_domain::error::Result;
use dbinject_domain::{OptionsFactory, Token};
use futures::FutureExt;
use futures::future::BoxFuture;

use crate::di::instance::{Instance, ResolvedDeps};

/// Producer function stored in a descriptor
pub type ProduceFn = Arc<dyn Fn(ResolvedDeps) -> BoxFuture<'static, Result<Instance>> + Send + Sync>;

/// How to build the value registered under a token
#[derive(Clone)]
pub struct ProviderDescriptor {
    /// Identity of the produced value
    pub token: Token,
    /// Tokens resolved before `produce` runs, in this order
    pub dependencies: Vec<Token>,
    produce: ProduceFn,
    singleton: bool,
}

impl ProviderDescriptor {
    /// Create a descriptor from an async producer
    pub fn new<F, Fut>(token: Token, dependencies: Vec<Token>, produce: F) -> Self
    where
        F: Fn(ResolvedDeps) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Instance>> + Send + 'static,
    {
        Self {
            token,
            dependencies,
            produce: Arc::new(move |deps| produce(deps).boxed()),
            singleton: true,
        }
    }

    /// Run the producer on every request instead of memoizing its value
    pub fn transient(mut self) -> Self {
        self.singleton = false;
        self
    }

    /// Whether the container memoizes the produced value
    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    /// Create a dependency-free descriptor that always yields `value`
    pub fn value<T>(token: Token, value: T) -> Self
    where
        T: Any + Clone + Send + Sync,
    {
        Self::new(token, Vec::new(), move |_| {
            futures::future::ready(Ok(Instance::new(value.clone())))
        })
    }

    /// Register an already constructed options provider under `token`
    pub fn options_factory(token: Token, factory: Arc<dyn OptionsFactory>) -> Self {
        Self::value(token, factory)
    }

    /// Run the producer with resolved dependencies
    pub fn produce(&self, deps: ResolvedDeps) -> BoxFuture<'static, Result<Instance>> {
        (self.produce)(deps)
    }
}

impl fmt::Debug for ProviderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDescriptor")
            .field("token", &self.token)
            .field("dependencies", &self.dependencies)
            .field("singleton", &self.singleton)
            .finish_non_exhaustive()
    }
}
