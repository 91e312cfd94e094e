//! Unit tests for the deferred option resolver
//!
//! Descriptors are run through a real container so the tests observe what a
//! host would observe: which capability methods ran and what value came out.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dbinject_domain::error::Error;
use dbinject_domain::{
    ConfigOptions, ConnectOptions, DriverOptions, OptionKind, OptionsFactory, Token,
};
use dbinject_infrastructure::di::{
    AsyncOptions, ClassRef, Config, Connect, Container, ContainerBuilder, Driver, OptionCategory,
    OptionSpec, ProviderDescriptor, resolve, resolve_optional,
};

use crate::test_utils::{CountingOptionsFactory, sample_connect};

fn container_with(providers: Vec<ProviderDescriptor>) -> Container {
    providers
        .into_iter()
        .fold(ContainerBuilder::new(), |builder, provider| {
            builder.with_provider(provider).expect("unique tokens")
        })
        .build()
        .expect("acyclic providers")
}

fn register(name: &str, factory: &Arc<CountingOptionsFactory>) -> ProviderDescriptor {
    let shared: Arc<dyn OptionsFactory> = factory.clone();
    ProviderDescriptor::options_factory(Token::named(name), shared)
}

// =============================================================================
// Static specs
// =============================================================================

#[tokio::test]
async fn test_static_value_passes_through_without_provider_calls() {
    let vault = Arc::new(CountingOptionsFactory::connect_only("vault", sample_connect()));
    let resolved = resolve::<Connect>(OptionSpec::value(sample_connect()));

    assert!(resolved.options.dependencies.is_empty());
    assert!(resolved.class.is_none());

    let container = container_with(vec![resolved.options, register("vault", &vault)]);
    let value = container
        .get_typed::<ConnectOptions>(&Connect::token())
        .await
        .expect("static connect options");

    assert_eq!(*value, sample_connect());
    assert_eq!(vault.total_calls(), 0);
}

#[tokio::test]
async fn test_absent_optional_spec_yields_defaults() {
    let vault = Arc::new(CountingOptionsFactory::full(
        "vault",
        sample_connect(),
        ConfigOptions::default().with_enhanced_functions(true),
        DriverOptions::default().with_schema(["audit"]),
    ));
    let config = resolve_optional::<Config>(None);
    let driver = resolve_optional::<Driver>(None);

    let container = container_with(vec![config.options, driver.options, register("vault", &vault)]);

    let config = container
        .get_typed::<ConfigOptions>(&Config::token())
        .await
        .expect("default config");
    let driver = container
        .get_typed::<DriverOptions>(&Driver::token())
        .await
        .expect("default driver");

    assert_eq!(*config, ConfigOptions::default());
    assert_eq!(*driver, DriverOptions::default());
    assert_eq!(vault.total_calls(), 0);
}

// =============================================================================
// Factory specs
// =============================================================================

#[tokio::test]
async fn test_factory_receives_dependencies_in_declared_order() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let spec = AsyncOptions::use_factory(
        vec![Token::named("DB_HOST"), Token::named("DB_PORT")],
        move |deps| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move {
                let tokens: Vec<String> = deps.tokens().map(ToString::to_string).collect();
                assert_eq!(tokens, ["DB_HOST", "DB_PORT"]);
                let host = deps.get::<String>(0)?;
                let port = deps.get::<u16>(1)?;
                Ok::<_, Error>(ConnectOptions::new(host.as_str(), *port, "app", "svc", "pw"))
            }
        },
    );

    let resolved = resolve::<Connect>(spec.into());
    assert_eq!(
        resolved.options.dependencies,
        vec![Token::named("DB_HOST"), Token::named("DB_PORT")]
    );

    let container = container_with(vec![
        resolved.options,
        ProviderDescriptor::value(Token::named("DB_HOST"), String::from("primary.db")),
        ProviderDescriptor::value(Token::named("DB_PORT"), 6543_u16),
    ]);

    let first = container
        .get_typed::<ConnectOptions>(&Connect::token())
        .await
        .expect("factory connect options");
    let second = container
        .get_typed::<ConnectOptions>(&Connect::token())
        .await
        .expect("memoized connect options");

    assert_eq!(first.host, "primary.db");
    assert_eq!(first.port, 6543);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_sync_factory_is_supported() {
    let spec = AsyncOptions::use_factory_sync(Vec::new(), |_| {
        Ok(DriverOptions::default().with_schema(["public", "audit"]))
    });
    let resolved = resolve::<Driver>(spec.into());
    let container = container_with(vec![resolved.options]);

    let driver = container
        .get_typed::<DriverOptions>(&Driver::token())
        .await
        .expect("sync factory driver options");
    assert_eq!(
        driver.schema,
        Some(vec!["public".to_owned(), "audit".to_owned()])
    );
}

#[tokio::test]
async fn test_factory_failure_is_a_resolution_error() {
    let spec: AsyncOptions<ConnectOptions> = AsyncOptions::use_factory(Vec::new(), |_| async {
        Err::<ConnectOptions, _>(Error::configuration("DATABASE_URL is not set"))
    });
    let container = container_with(resolve::<Connect>(spec.into()).into_descriptors());

    let err = container
        .get(&Connect::token())
        .await
        .expect_err("factory fails");

    match err {
        Error::Resolution { token, message, .. } => {
            assert_eq!(token, Connect::token().to_string());
            assert!(message.contains("DATABASE_URL is not set"));
        }
        other => panic!("expected resolution error, got {other:?}"),
    }
}

// =============================================================================
// Existing provider specs
// =============================================================================

#[tokio::test]
async fn test_existing_provider_dispatches_only_the_category_method() {
    let config = ConfigOptions::default().with_allowed_schemas(["public"]);
    let vault = Arc::new(CountingOptionsFactory::full(
        "vault",
        sample_connect(),
        config.clone(),
        DriverOptions::default(),
    ));

    let resolved = resolve::<Config>(AsyncOptions::use_existing("vault").into());
    assert_eq!(resolved.options.dependencies, vec![Token::named("vault")]);

    let container = container_with(vec![resolved.options, register("vault", &vault)]);
    let value = container
        .get_typed::<ConfigOptions>(&Config::token())
        .await
        .expect("config from provider");

    assert_eq!(*value, config);
    assert_eq!(vault.config_count(), 1);
    assert_eq!(vault.connect_count(), 0);
    assert_eq!(vault.driver_count(), 0);
}

#[tokio::test]
async fn test_missing_capability_fails_closed() {
    let vault = Arc::new(CountingOptionsFactory::connect_only("vault", sample_connect()));
    let resolved = resolve::<Driver>(AsyncOptions::use_existing("vault").into());
    let container = container_with(vec![resolved.options, register("vault", &vault)]);

    let err = container
        .get(&Driver::token())
        .await
        .expect_err("driver capability is missing");

    assert!(matches!(
        err,
        Error::MissingCapability { category: OptionKind::Driver, ref provider } if provider == "vault"
    ));
    assert!(err.to_string().contains("create_driver_options"));
    assert_eq!(vault.total_calls(), 0);
}

#[tokio::test]
async fn test_capability_failure_is_a_resolution_error() {
    let vault = Arc::new(CountingOptionsFactory::connect_only("vault", sample_connect()).failing());
    let resolved = resolve::<Connect>(AsyncOptions::use_existing("vault").into());
    let container = container_with(vec![resolved.options, register("vault", &vault)]);

    let err = container
        .get(&Connect::token())
        .await
        .expect_err("capability fails");

    assert!(matches!(err, Error::Resolution { .. }));
    assert!(err.to_string().contains("secret store unavailable"));
    assert_eq!(vault.connect_count(), 1);
}

#[tokio::test]
async fn test_existing_reference_to_unknown_provider() {
    let resolved = resolve::<Connect>(AsyncOptions::use_existing("nowhere").into());
    let container = container_with(vec![resolved.options]);

    let err = container
        .get(&Connect::token())
        .await
        .expect_err("provider is not registered");
    assert!(matches!(err, Error::ProviderNotFound { ref token } if token == "nowhere"));
}

// =============================================================================
// Class specs
// =============================================================================

#[tokio::test]
async fn test_class_reference_instantiates_then_dispatches() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&built);
    let class = ClassRef::of(Token::named("EnvOptions"), move || {
        counter.fetch_add(1, Ordering::SeqCst);
        CountingOptionsFactory::connect_only("env", sample_connect())
    });

    let resolved = resolve::<Connect>(AsyncOptions::use_class(class).into());
    let class_provider = resolved.class.as_ref().expect("class descriptor");
    assert_eq!(class_provider.descriptor.token, Token::named("EnvOptions"));
    assert_eq!(class_provider.reference.token(), &Token::named("EnvOptions"));
    assert_eq!(resolved.options.dependencies, vec![Token::named("EnvOptions")]);

    let descriptors = resolved.into_descriptors();
    assert_eq!(descriptors[0].token, Token::named("EnvOptions"));

    let container = container_with(descriptors);
    let value = container
        .get_typed::<ConnectOptions>(&Connect::token())
        .await
        .expect("connect options from class");

    assert_eq!(*value, sample_connect());
    assert_eq!(built.load(Ordering::SeqCst), 1);
    assert!(container.is_resolved(&Token::named("EnvOptions")));
}

#[tokio::test]
async fn test_class_constructor_receives_dependencies() {
    let class = ClassRef::new(
        Token::named("TenantOptions"),
        vec![Token::named("TENANT")],
        |deps| async move {
            let tenant = deps.get::<String>(0)?;
            let connect = ConnectOptions::new("db.test", 5432, tenant.as_str(), "svc", "pw");
            let provider: Arc<dyn OptionsFactory> =
                Arc::new(CountingOptionsFactory::connect_only("tenant", connect));
            Ok::<_, Error>(provider)
        },
    );

    let mut descriptors = resolve::<Connect>(AsyncOptions::use_class(class).into()).into_descriptors();
    descriptors.push(ProviderDescriptor::value(
        Token::named("TENANT"),
        String::from("acme"),
    ));
    let container = container_with(descriptors);

    let value = container
        .get_typed::<ConnectOptions>(&Connect::token())
        .await
        .expect("tenant connect options");
    assert_eq!(value.database, "acme");
}
