//! Async singleton container
//!
//! Hosts the provider descriptors of one or more modules and instantiates
//! them on demand, dependencies first. Singleton tokens memoize their first
//! successful resolution and retry a failed one on the next request.
//! Transient tokens run their producer on every request.
//!
//! ```ignore
//! let container = ContainerBuilder::new()
//!     .with_module(DatabaseModule::register(client, connect, None, None))?
//!     .build()?;
//! let db = container.get_typed::<PgDatabase>(&CategoryToken::Connection.into()).await?;
//! ```

use std::any::{Any, type_name};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use dbinject_domain::Token;
use dbinject_domain::error::{Error, Result};
use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::OnceCell;
use tracing::info;

use crate::di::instance::{Instance, ResolvedDeps};
use crate::di::module::ModuleRef;
use crate::di::provider::ProviderDescriptor;
use crate::logging::log_provider_resolved;

/// Collects modules and providers, then freezes them into a [`Container`]
#[derive(Debug, Default)]
pub struct ContainerBuilder {
    providers: HashMap<Token, ProviderDescriptor>,
    order: Vec<Token>,
    modules: HashSet<ModuleRef>,
}

impl ContainerBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module, its imports first
    ///
    /// Each distinct module is registered once no matter how many modules
    /// import it. Fails on a token that is already registered.
    pub fn with_module<M: Into<ModuleRef>>(mut self, module: M) -> Result<Self> {
        self.register_module(&module.into())?;
        Ok(self)
    }

    /// Register a single provider
    pub fn with_provider(mut self, provider: ProviderDescriptor) -> Result<Self> {
        self.register(provider)?;
        Ok(self)
    }

    /// Freeze the registrations
    ///
    /// Fails when providers depend on each other in a loop. Dependencies on
    /// unregistered tokens are reported when they are first requested.
    pub fn build(self) -> Result<Container> {
        detect_cycles(&self.providers, &self.order)?;

        let slots = self
            .providers
            .into_iter()
            .map(|(token, descriptor)| {
                let slot = Slot {
                    descriptor,
                    cell: OnceCell::new(),
                };
                (token, slot)
            })
            .collect();

        Ok(Container {
            inner: Arc::new(Inner {
                slots,
                order: self.order,
            }),
        })
    }

    fn register_module(&mut self, module: &ModuleRef) -> Result<()> {
        if !self.modules.insert(module.clone()) {
            return Ok(());
        }
        for import in module.imports() {
            self.register_module(import)?;
        }
        for provider in module.providers() {
            self.register(provider.clone())?;
        }
        info!(
            module = module.name(),
            providers = module.providers().len(),
            imports = module.imports().len(),
            "Module registered"
        );
        Ok(())
    }

    fn register(&mut self, provider: ProviderDescriptor) -> Result<()> {
        if self.providers.contains_key(&provider.token) {
            return Err(Error::duplicate_provider(&provider.token));
        }
        self.order.push(provider.token.clone());
        self.providers.insert(provider.token.clone(), provider);
        Ok(())
    }
}

struct Slot {
    descriptor: ProviderDescriptor,
    cell: OnceCell<Instance>,
}

struct Inner {
    slots: HashMap<Token, Slot>,
    order: Vec<Token>,
}

/// Resolves registered tokens into shared instances
#[derive(Clone)]
pub struct Container {
    inner: Arc<Inner>,
}

impl Container {
    /// Resolve `token`, instantiating its dependencies first
    pub async fn get(&self, token: &Token) -> Result<Instance> {
        self.resolve(token).await
    }

    /// Resolve `token` and downcast it to `T`
    pub async fn get_typed<T: Any + Send + Sync>(&self, token: &Token) -> Result<Arc<T>> {
        let instance = self.get(token).await?;
        instance
            .downcast::<T>()
            .ok_or_else(|| Error::dependency_type(token, type_name::<T>()))
    }

    /// Whether a provider is registered for `token`
    pub fn contains(&self, token: &Token) -> bool {
        self.inner.slots.contains_key(token)
    }

    /// Whether the singleton `token` has already been instantiated
    ///
    /// Always false for transient tokens.
    pub fn is_resolved(&self, token: &Token) -> bool {
        self.inner
            .slots
            .get(token)
            .is_some_and(|slot| slot.cell.initialized())
    }

    /// Number of registered providers
    pub fn len(&self) -> usize {
        self.inner.slots.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.inner.slots.is_empty()
    }

    /// Registered tokens in registration order
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.inner.order.iter()
    }

    fn resolve<'a>(&'a self, token: &'a Token) -> BoxFuture<'a, Result<Instance>> {
        async move {
            let slot = self
                .inner
                .slots
                .get(token)
                .ok_or_else(|| Error::provider_not_found(token))?;

            if !slot.descriptor.is_singleton() {
                return self.instantiate(token, slot).await;
            }
            let instance = slot
                .cell
                .get_or_try_init(|| self.instantiate(token, slot))
                .await?;
            Ok(instance.clone())
        }
        .boxed()
    }

    async fn instantiate(&self, token: &Token, slot: &Slot) -> Result<Instance> {
        let dependencies = &slot.descriptor.dependencies;
        let mut entries = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            let instance = self.resolve(dependency).await?;
            entries.push((dependency.clone(), instance));
        }
        let instance = slot.descriptor.produce(ResolvedDeps::new(entries)).await?;
        log_provider_resolved(&token.to_string(), dependencies.len());
        Ok(instance)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("tokens", &self.inner.order)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

fn detect_cycles(providers: &HashMap<Token, ProviderDescriptor>, order: &[Token]) -> Result<()> {
    let mut visits = HashMap::new();
    let mut stack = Vec::new();
    for token in order {
        visit(token, providers, &mut visits, &mut stack)?;
    }
    Ok(())
}

fn visit<'a>(
    token: &'a Token,
    providers: &'a HashMap<Token, ProviderDescriptor>,
    visits: &mut HashMap<&'a Token, Visit>,
    stack: &mut Vec<&'a Token>,
) -> Result<()> {
    match visits.get(token) {
        Some(Visit::Done) => return Ok(()),
        Some(Visit::InProgress) => {
            let start = stack.iter().position(|t| *t == token).unwrap_or(0);
            let path = stack[start..]
                .iter()
                .chain(Some(&token))
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(Error::DependencyCycle { path });
        }
        None => {}
    }

    let Some(descriptor) = providers.get(token) else {
        return Ok(());
    };

    visits.insert(token, Visit::InProgress);
    stack.push(token);
    for dependency in &descriptor.dependencies {
        visit(dependency, providers, visits, stack)?;
    }
    stack.pop();
    visits.insert(token, Visit::Done);
    Ok(())
}
