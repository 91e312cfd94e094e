//! Option specifications
//!
//! Each option category is supplied either as a [`OptionSpec::Static`] value
//! or as a [`OptionSpec::Deferred`] description of how to obtain it later:
//!
//! | Source | Dependencies | Produces |
//! |--------|--------------|----------|
//! | [`OptionSource::Factory`] | declared `inject` list | result of the factory |
//! | [`OptionSource::Existing`] | the referenced provider | its capability method |
//! | [`OptionSource::Class`] | the instantiated provider | its capability method |
//!
//! The per-category behavior (token, capability method, default value) is
//! described by [`OptionCategory`], implemented by [`Connect`], [`Config`]
//! and [`Driver`].

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use dbinject_domain::error::Result;
use dbinject_domain::{
    ConfigOptions, ConnectOptions, DriverOptions, OptionKind, OptionsFactory, Token,
};
use futures::FutureExt;
use futures::future::BoxFuture;

use crate::di::instance::ResolvedDeps;
use crate::di::module::ModuleRef;

/// Deferred producer of a value from resolved dependencies
pub type FactoryFn<T> = Arc<dyn Fn(ResolvedDeps) -> BoxFuture<'static, Result<T>> + Send + Sync>;

// ============================================================================
// Option categories
// ============================================================================

/// Per-category behavior used by the resolver
pub trait OptionCategory: Send + Sync + 'static {
    /// Value type of the category
    type Value: Any + Clone + Default + fmt::Debug + Send + Sync;

    /// Category discriminator
    const KIND: OptionKind;

    /// Token under which the resolved value is registered
    fn token() -> Token {
        Token::Category(Self::KIND.token())
    }

    /// Invoke this category's capability method, `None` when unsupported
    fn produce(factory: &dyn OptionsFactory) -> BoxFuture<'_, Option<Result<Self::Value>>>;
}

/// Connect options category (required)
#[derive(Debug, Clone, Copy)]
pub struct Connect;

/// Config options category (optional)
#[derive(Debug, Clone, Copy)]
pub struct Config;

/// Driver options category (optional)
#[derive(Debug, Clone, Copy)]
pub struct Driver;

impl OptionCategory for Connect {
    type Value = ConnectOptions;
    const KIND: OptionKind = OptionKind::Connect;

    fn produce(factory: &dyn OptionsFactory) -> BoxFuture<'_, Option<Result<ConnectOptions>>> {
        async move { Some(factory.create_connect_options().await) }.boxed()
    }
}

impl OptionCategory for Config {
    type Value = ConfigOptions;
    const KIND: OptionKind = OptionKind::Config;

    fn produce(factory: &dyn OptionsFactory) -> BoxFuture<'_, Option<Result<ConfigOptions>>> {
        factory.create_config_options()
    }
}

impl OptionCategory for Driver {
    type Value = DriverOptions;
    const KIND: OptionKind = OptionKind::Driver;

    fn produce(factory: &dyn OptionsFactory) -> BoxFuture<'_, Option<Result<DriverOptions>>> {
        factory.create_driver_options()
    }
}

// ============================================================================
// Specifications
// ============================================================================

/// A static value or a deferred description of one
pub enum OptionSpec<T> {
    /// Value known at composition time
    Static(T),
    /// Value obtained later through a provider
    Deferred(AsyncOptions<T>),
}

impl<T> OptionSpec<T> {
    /// Static spec
    pub fn value(value: T) -> Self {
        Self::Static(value)
    }

    /// Deferred spec
    pub fn deferred(options: AsyncOptions<T>) -> Self {
        Self::Deferred(options)
    }

    /// True for deferred specs
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }
}

impl<T: Clone> Clone for OptionSpec<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(value) => Self::Static(value.clone()),
            Self::Deferred(options) => Self::Deferred(options.clone()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for OptionSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Deferred(options) => f.debug_tuple("Deferred").field(options).finish(),
        }
    }
}

impl<T> From<AsyncOptions<T>> for OptionSpec<T> {
    fn from(options: AsyncOptions<T>) -> Self {
        Self::Deferred(options)
    }
}

/// Deferred option specification
pub struct AsyncOptions<T> {
    /// Modules that must be composed before this spec can be resolved
    pub imports: Vec<ModuleRef>,
    /// Where the value comes from
    pub source: OptionSource<T>,
}

/// Indirection used by a deferred spec
pub enum OptionSource<T> {
    /// Inline factory called with the resolved `inject` values, in order
    Factory {
        /// Dependencies passed to the factory
        inject: Vec<Token>,
        /// The factory
        factory: FactoryFn<T>,
    },
    /// An already registered [`OptionsFactory`] provider
    Existing(Token),
    /// An [`OptionsFactory`] to be instantiated by the container
    Class(ClassRef),
}

impl<T> AsyncOptions<T> {
    /// Use an async factory with declared dependencies
    ///
    /// # Example
    ///
    /// ```
    /// use dbinject_domain::{ConnectOptions, Error, Token};
    /// use dbinject_infrastructure::di::AsyncOptions;
    ///
    /// let options = AsyncOptions::use_factory(vec![Token::named("DB_HOST")], |deps| async move {
    ///     let host = deps.get::<String>(0)?;
    ///     Ok::<_, Error>(ConnectOptions::new(host.as_str(), 5432, "app", "u", "p"))
    /// });
    /// assert!(options.imports.is_empty());
    /// ```
    pub fn use_factory<F, Fut>(inject: Vec<Token>, factory: F) -> Self
    where
        F: Fn(ResolvedDeps) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            imports: Vec::new(),
            source: OptionSource::Factory {
                inject,
                factory: Arc::new(move |deps| factory(deps).boxed()),
            },
        }
    }

    /// Use a synchronous factory with declared dependencies
    pub fn use_factory_sync<F>(inject: Vec<Token>, factory: F) -> Self
    where
        F: Fn(ResolvedDeps) -> Result<T> + Send + Sync + 'static,
        T: Send + 'static,
    {
        Self::use_factory(inject, move |deps| futures::future::ready(factory(deps)))
    }

    /// Use an already registered options provider
    pub fn use_existing<K: Into<Token>>(provider: K) -> Self {
        Self {
            imports: Vec::new(),
            source: OptionSource::Existing(provider.into()),
        }
    }

    /// Instantiate an options provider and use it
    pub fn use_class(class: ClassRef) -> Self {
        Self {
            imports: Vec::new(),
            source: OptionSource::Class(class),
        }
    }

    /// Declare modules required by this spec
    pub fn with_imports<I>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = ModuleRef>,
    {
        self.imports.extend(imports);
        self
    }
}

impl<T> Clone for AsyncOptions<T> {
    fn clone(&self) -> Self {
        Self {
            imports: self.imports.clone(),
            source: self.source.clone(),
        }
    }
}

impl<T> Clone for OptionSource<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Factory { inject, factory } => Self::Factory {
                inject: inject.clone(),
                factory: Arc::clone(factory),
            },
            Self::Existing(token) => Self::Existing(token.clone()),
            Self::Class(class) => Self::Class(class.clone()),
        }
    }
}

impl<T> fmt::Debug for AsyncOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncOptions")
            .field("imports", &self.imports)
            .field("source", &self.source)
            .finish()
    }
}

impl<T> fmt::Debug for OptionSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Factory { inject, .. } => f
                .debug_struct("Factory")
                .field("inject", inject)
                .finish_non_exhaustive(),
            Self::Existing(token) => f.debug_tuple("Existing").field(token).finish(),
            Self::Class(class) => f.debug_tuple("Class").field(class).finish(),
        }
    }
}

// ============================================================================
// Class references
// ============================================================================

/// Reference to an options provider the container instantiates itself
///
/// Once instantiated it is used exactly like an existing provider; the class
/// only adds its own registration under `token`.
#[derive(Clone)]
pub struct ClassRef {
    token: Token,
    dependencies: Vec<Token>,
    construct: FactoryFn<Arc<dyn OptionsFactory>>,
}

impl ClassRef {
    /// Class whose constructor needs resolved dependencies
    pub fn new<F, Fut>(token: Token, dependencies: Vec<Token>, construct: F) -> Self
    where
        F: Fn(ResolvedDeps) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Arc<dyn OptionsFactory>>> + Send + 'static,
    {
        Self {
            token,
            dependencies,
            construct: Arc::new(move |deps| construct(deps).boxed()),
        }
    }

    /// Class with a dependency-free constructor
    pub fn of<P, F>(token: Token, construct: F) -> Self
    where
        P: OptionsFactory + 'static,
        F: Fn() -> P + Send + Sync + 'static,
    {
        Self::new(token, Vec::new(), move |_| {
            let provider: Arc<dyn OptionsFactory> = Arc::new(construct());
            futures::future::ready(Ok(provider))
        })
    }

    /// Token the instantiated provider is registered under
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Constructor dependencies
    pub fn dependencies(&self) -> &[Token] {
        &self.dependencies
    }

    /// Whether `other` is a clone of this class reference
    ///
    /// Identity follows the constructor, not the token: two classes built
    /// separately are different even when they share a token.
    pub fn same(&self, other: &ClassRef) -> bool {
        Arc::ptr_eq(&self.construct, &other.construct)
    }

    /// Run the constructor
    pub fn construct(&self, deps: ResolvedDeps) -> BoxFuture<'static, Result<Arc<dyn OptionsFactory>>> {
        (self.construct)(deps)
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRef")
            .field("token", &self.token)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}
