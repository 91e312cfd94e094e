//! Registration units
//!
//! A [`Module`] groups provider descriptors with the modules they need.
//! Modules are shared through [`ModuleRef`], whose equality and hashing use
//! reference identity: two separately built modules with identical contents
//! are different modules.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use dbinject_domain::Token;

use crate::di::provider::ProviderDescriptor;

/// A named set of providers plus the modules they import
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    imports: Vec<ModuleRef>,
    providers: Vec<ProviderDescriptor>,
}

impl Module {
    /// Start building a module
    pub fn builder<S: Into<String>>(name: S) -> ModuleBuilder {
        ModuleBuilder {
            module: Self {
                name: name.into(),
                imports: Vec::new(),
                providers: Vec::new(),
            },
        }
    }

    /// Module name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Imported modules
    pub fn imports(&self) -> &[ModuleRef] {
        &self.imports
    }

    /// Providers declared by this module
    pub fn providers(&self) -> &[ProviderDescriptor] {
        &self.providers
    }

    /// Tokens declared by this module
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.providers.iter().map(|provider| &provider.token)
    }

    /// Whether this module declares `token`
    pub fn provides(&self, token: &Token) -> bool {
        self.tokens().any(|candidate| candidate == token)
    }

    /// Share this module so other specs can import it
    pub fn into_ref(self) -> ModuleRef {
        ModuleRef(Arc::new(self))
    }
}

/// Builder for [`Module`]
#[derive(Debug)]
pub struct ModuleBuilder {
    module: Module,
}

impl ModuleBuilder {
    /// Import one module
    pub fn import(mut self, module: ModuleRef) -> Self {
        self.module.imports.push(module);
        self
    }

    /// Import several modules
    pub fn imports<I: IntoIterator<Item = ModuleRef>>(mut self, modules: I) -> Self {
        self.module.imports.extend(modules);
        self
    }

    /// Add one provider
    pub fn provider(mut self, provider: ProviderDescriptor) -> Self {
        self.module.providers.push(provider);
        self
    }

    /// Add several providers
    pub fn providers<I: IntoIterator<Item = ProviderDescriptor>>(mut self, providers: I) -> Self {
        self.module.providers.extend(providers);
        self
    }

    /// Finish the module
    pub fn build(self) -> Module {
        self.module
    }
}

/// Shared reference to a module, compared by identity
#[derive(Clone)]
pub struct ModuleRef(Arc<Module>);

impl ModuleRef {
    /// True when both refer to the same module allocation
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for ModuleRef {
    type Target = Module;

    fn deref(&self) -> &Module {
        &self.0
    }
}

impl From<Module> for ModuleRef {
    fn from(module: Module) -> Self {
        module.into_ref()
    }
}

impl PartialEq for ModuleRef {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for ModuleRef {}

impl Hash for ModuleRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModuleRef").field(&self.0.name).finish()
    }
}
