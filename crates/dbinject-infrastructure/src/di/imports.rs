//! Import aggregation
//!
//! Deferred specs may need modules of their own, e.g. the module that
//! registers the options provider referenced by `use_existing`. The database
//! module imports the union of those, each module once.

use std::collections::HashSet;

use crate::di::module::ModuleRef;
use crate::di::options::{AsyncOptions, OptionSpec};

/// Anything that can declare module imports
pub trait DeclaresImports {
    /// Modules this value needs
    fn declared_imports(&self) -> &[ModuleRef];
}

impl<T> DeclaresImports for AsyncOptions<T> {
    fn declared_imports(&self) -> &[ModuleRef] {
        &self.imports
    }
}

impl<T> DeclaresImports for OptionSpec<T> {
    fn declared_imports(&self) -> &[ModuleRef] {
        match self {
            Self::Static(_) => &[],
            Self::Deferred(options) => options.declared_imports(),
        }
    }
}

/// Union of the imports declared by the present specs
///
/// Deduplication uses reference identity, so two distinct modules with equal
/// contents both remain. Absent specs contribute nothing. The result is
/// unordered.
pub fn aggregate_imports<'a, I>(specs: I) -> HashSet<ModuleRef>
where
    I: IntoIterator<Item = Option<&'a dyn DeclaresImports>>,
{
    specs
        .into_iter()
        .flatten()
        .flat_map(|spec| spec.declared_imports().iter().cloned())
        .collect()
}
