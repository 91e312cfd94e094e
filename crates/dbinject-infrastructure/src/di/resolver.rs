//! Deferred option resolver
//!
//! Turns one category's [`OptionSpec`] into the provider descriptors the
//! container needs to produce the resolved value.
//!
//! ```text
//! Static(value)            ──► options: no deps, yields value
//! Factory { inject, f }    ──► options: deps = inject, yields f(deps).await
//! Existing(token)          ──► options: deps = [token], yields capability(provider)
//! Class(class)             ──► class:   deps = class deps, instantiates provider
//!                              options: deps = [class token], as Existing
//! (absent, optional only)  ──► options: no deps, yields Default::default()
//! ```
//!
//! Resolution never fails while building descriptors. Failures surface when
//! the container runs them: a failing factory or capability method becomes
//! [`Error::Resolution`], a provider without the category's capability
//! method becomes [`Error::MissingCapability`].

use std::sync::Arc;

use dbinject_domain::error::{Error, Result};
use dbinject_domain::{OptionsFactory, Token};
use tracing::debug;

use crate::di::instance::{Instance, ResolvedDeps};
use crate::di::options::{ClassRef, FactoryFn, OptionCategory, OptionSource, OptionSpec};
use crate::di::provider::ProviderDescriptor;

/// Descriptors produced for one option category
#[derive(Debug, Clone)]
pub struct CategoryProviders {
    /// Descriptor registered under the category token
    pub options: ProviderDescriptor,
    /// Class-referenced options provider, when the spec names one
    pub class: Option<ClassProvider>,
}

/// A class reference with the descriptor that instantiates it
#[derive(Debug, Clone)]
pub struct ClassProvider {
    /// The class the descriptor was built from
    pub reference: ClassRef,
    /// Descriptor registered under the class token
    pub descriptor: ProviderDescriptor,
}

impl CategoryProviders {
    fn options_only(options: ProviderDescriptor) -> Self {
        Self {
            options,
            class: None,
        }
    }

    /// All descriptors, class first
    pub fn into_descriptors(self) -> Vec<ProviderDescriptor> {
        self.class
            .map(|class| class.descriptor)
            .into_iter()
            .chain(Some(self.options))
            .collect()
    }
}

/// Build the descriptors for a category's spec
pub fn resolve<C: OptionCategory>(spec: OptionSpec<C::Value>) -> CategoryProviders {
    let token = C::token();
    match spec {
        OptionSpec::Static(value) => {
            debug!(category = %C::KIND, token = %token, "Resolving static options");
            CategoryProviders::options_only(ProviderDescriptor::value(token, value))
        }
        OptionSpec::Deferred(options) => match options.source {
            OptionSource::Factory { inject, factory } => {
                debug!(
                    category = %C::KIND,
                    token = %token,
                    dependencies = inject.len(),
                    "Resolving options through factory"
                );
                CategoryProviders::options_only(factory_descriptor::<C>(token, inject, factory))
            }
            OptionSource::Existing(provider) => {
                debug!(
                    category = %C::KIND,
                    token = %token,
                    provider = %provider,
                    "Resolving options through existing provider"
                );
                CategoryProviders::options_only(capability_descriptor::<C>(token, provider))
            }
            OptionSource::Class(class) => {
                debug!(
                    category = %C::KIND,
                    token = %token,
                    class = %class.token(),
                    "Resolving options through class provider"
                );
                let options = capability_descriptor::<C>(token, class.token().clone());
                CategoryProviders {
                    options,
                    class: Some(ClassProvider {
                        descriptor: class_descriptor(class.clone()),
                        reference: class,
                    }),
                }
            }
        },
    }
}

/// Build the descriptors for an optional category
///
/// An absent spec yields the category's default value without consulting
/// any provider.
pub fn resolve_optional<C: OptionCategory>(spec: Option<OptionSpec<C::Value>>) -> CategoryProviders {
    match spec {
        Some(spec) => resolve::<C>(spec),
        None => {
            debug!(category = %C::KIND, "No options supplied, using defaults");
            CategoryProviders::options_only(ProviderDescriptor::value(
                C::token(),
                C::Value::default(),
            ))
        }
    }
}

fn factory_descriptor<C: OptionCategory>(
    token: Token,
    inject: Vec<Token>,
    factory: FactoryFn<C::Value>,
) -> ProviderDescriptor {
    let target = token.clone();
    ProviderDescriptor::new(token, inject, move |deps: ResolvedDeps| {
        let produced = factory(deps);
        let target = target.clone();
        async move {
            let value = produced
                .await
                .map_err(|err| Error::resolution(&target, err))?;
            Ok::<_, Error>(Instance::new(value))
        }
    })
}

fn capability_descriptor<C: OptionCategory>(token: Token, provider: Token) -> ProviderDescriptor {
    let target = token.clone();
    ProviderDescriptor::new(token, vec![provider], move |deps: ResolvedDeps| {
        let target = target.clone();
        async move {
            let factory = deps.get::<Arc<dyn OptionsFactory>>(0)?;
            let factory: &dyn OptionsFactory = &**factory;
            let value = invoke_capability::<C>(factory)
                .await
                .map_err(|err| Error::resolution(&target, err))?;
            Ok::<_, Error>(Instance::new(value))
        }
    })
}

async fn invoke_capability<C: OptionCategory>(factory: &dyn OptionsFactory) -> Result<C::Value> {
    match C::produce(factory).await {
        Some(result) => result,
        None => Err(Error::missing_capability(C::KIND, factory.provider_name())),
    }
}

fn class_descriptor(class: ClassRef) -> ProviderDescriptor {
    let token = class.token().clone();
    let dependencies = class.dependencies().to_vec();
    let target = token.clone();
    ProviderDescriptor::new(token, dependencies, move |deps: ResolvedDeps| {
        let constructed = class.construct(deps);
        let target = target.clone();
        async move {
            let provider = constructed
                .await
                .map_err(|err| Error::resolution(&target, err))?;
            debug!(class = %target, provider = provider.provider_name(), "Options provider instantiated");
            Ok::<_, Error>(Instance::new(provider))
        }
    })
}
