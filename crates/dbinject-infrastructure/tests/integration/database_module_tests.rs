//! End-to-end composition of the database module inside a container

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use dbinject_domain::error::Error;
use dbinject_domain::{
    CategoryToken, ConfigOptions, ConnectOptions, DriverOptions, OptionKind, OptionsFactory, Token,
};
use dbinject_infrastructure::di::{
    AsyncOptions, ClassRef, Container, Module, ModuleRef, OptionSpec, ProviderDescriptor,
};
use dbinject_infrastructure::{ConnectionManager, ConnectionState, ContainerBuilder, DatabaseModule};
use futures::future::join_all;

use crate::test_utils::{CountingOptionsFactory, RecordedConnection, RecordingClient, sample_connect};

fn build(module: Module) -> Container {
    ContainerBuilder::new()
        .with_module(module)
        .and_then(ContainerBuilder::build)
        .expect("database container")
}

fn vault_spec<T>(module: &ModuleRef) -> OptionSpec<T> {
    AsyncOptions::use_existing("VAULT")
        .with_imports([module.clone()])
        .into()
}

#[tokio::test]
async fn test_static_registration_connects_once() {
    let client = Arc::new(RecordingClient::new());
    let config = ConfigOptions::default().with_allowed_schemas(["public"]);
    let module = DatabaseModule::register(
        Arc::clone(&client),
        sample_connect(),
        Some(config.clone()),
        None,
    );
    let container = build(module);

    assert!(container.contains(&CategoryToken::ConnectOptions.into()));
    assert!(container.contains(&CategoryToken::ConfigOptions.into()));
    assert!(container.contains(&CategoryToken::DriverOptions.into()));
    assert_eq!(client.connect_count(), 0);

    let first = container
        .get_typed::<RecordedConnection>(&DatabaseModule::connection_token())
        .await
        .expect("connection");
    let second = container
        .get_typed::<RecordedConnection>(&DatabaseModule::connection_token())
        .await
        .expect("cached connection");

    assert_eq!(*first, *second);
    assert_eq!(client.connect_count(), 1);

    let (connect, received_config, driver) = client.last_options().expect("options");
    assert_eq!(connect, sample_connect());
    assert_eq!(received_config, config);
    assert_eq!(driver, DriverOptions::default());

    let manager = container
        .get_typed::<ConnectionManager<RecordingClient>>(&DatabaseModule::manager_token())
        .await
        .expect("manager");
    assert_eq!(manager.state().await, ConnectionState::Connected);
}

#[tokio::test]
async fn test_manager_connects_directly_and_container_reuses_it() {
    let client = Arc::new(RecordingClient::new());
    let container = build(DatabaseModule::register(
        Arc::clone(&client),
        sample_connect(),
        None,
        None,
    ));

    let manager = container
        .get_typed::<ConnectionManager<RecordingClient>>(&DatabaseModule::manager_token())
        .await
        .expect("manager");
    assert_eq!(manager.state().await, ConnectionState::Unconnected);

    let direct = manager.connect().await.expect("direct connect");
    let via_container = container
        .get_typed::<RecordedConnection>(&DatabaseModule::connection_token())
        .await
        .expect("container connection");

    assert_eq!(direct, *via_container);
    assert_eq!(client.connect_count(), 1);
}

#[tokio::test]
async fn test_existing_provider_feeds_all_categories() {
    let vault = Arc::new(CountingOptionsFactory::full(
        "vault",
        sample_connect(),
        ConfigOptions::default().with_enhanced_functions(true),
        DriverOptions::default().with_schema(["audit"]),
    ));
    let shared: Arc<dyn OptionsFactory> = vault.clone();
    let vault_module = Module::builder("VaultModule")
        .provider(ProviderDescriptor::options_factory(Token::named("VAULT"), shared))
        .build()
        .into_ref();

    let client = Arc::new(RecordingClient::new());
    let module = DatabaseModule::register_async(
        Arc::clone(&client),
        vault_spec(&vault_module),
        Some(vault_spec(&vault_module)),
        Some(vault_spec(&vault_module)),
    );
    assert_eq!(module.imports().len(), 1);

    let container = build(module);
    container
        .get(&DatabaseModule::connection_token())
        .await
        .expect("connection");

    assert_eq!(vault.connect_count(), 1);
    assert_eq!(vault.config_count(), 1);
    assert_eq!(vault.driver_count(), 1);

    let (_, config, driver) = client.last_options().expect("options");
    assert_eq!(config.enhanced_functions, Some(true));
    assert_eq!(driver.schema, Some(vec!["audit".to_owned()]));
}

#[tokio::test]
async fn test_missing_capability_prevents_connect() {
    let vault = Arc::new(CountingOptionsFactory::connect_only("vault", sample_connect()));
    let shared: Arc<dyn OptionsFactory> = vault.clone();
    let vault_module = Module::builder("VaultModule")
        .provider(ProviderDescriptor::options_factory(Token::named("VAULT"), shared))
        .build()
        .into_ref();

    let client = Arc::new(RecordingClient::new());
    let module = DatabaseModule::register_async(
        Arc::clone(&client),
        AsyncOptions::use_existing("VAULT")
            .with_imports([vault_module.clone()])
            .into(),
        None,
        Some(
            AsyncOptions::use_existing("VAULT")
                .with_imports([vault_module])
                .into(),
        ),
    );
    let container = build(module);

    let err = container
        .get(&DatabaseModule::connection_token())
        .await
        .expect_err("driver capability is missing");

    assert!(matches!(
        err,
        Error::MissingCapability { category: OptionKind::Driver, .. }
    ));
    assert_eq!(client.connect_count(), 0);
}

#[tokio::test]
async fn test_class_shared_by_categories_is_built_once() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&built);
    let class = ClassRef::of(Token::named("EnvOptions"), move || {
        counter.fetch_add(1, Ordering::SeqCst);
        CountingOptionsFactory::full(
            "env",
            sample_connect(),
            ConfigOptions::default(),
            DriverOptions::default().with_schema(["public"]),
        )
    });

    let client = Arc::new(RecordingClient::new());
    let module = DatabaseModule::register_async(
        Arc::clone(&client),
        AsyncOptions::use_class(class.clone()).into(),
        Some(AsyncOptions::use_class(class.clone()).into()),
        Some(AsyncOptions::use_class(class).into()),
    );
    let class_token = Token::named("EnvOptions");
    assert!(module.provides(&class_token));
    assert!(module.provides(&DatabaseModule::connection_token()));
    assert_eq!(module.tokens().filter(|t| **t == class_token).count(), 1);

    let container = build(module);
    container
        .get(&DatabaseModule::connection_token())
        .await
        .expect("connection");

    assert_eq!(built.load(Ordering::SeqCst), 1);
    assert_eq!(client.connect_count(), 1);
}

#[tokio::test]
async fn test_conflicting_classes_under_one_token_are_rejected() {
    let connect_class = ClassRef::of(Token::named("OPTS"), || {
        CountingOptionsFactory::connect_only("primary", sample_connect())
    });
    let config_class = ClassRef::of(Token::named("OPTS"), || {
        CountingOptionsFactory::full(
            "secondary",
            sample_connect(),
            ConfigOptions::default().with_enhanced_functions(false),
            DriverOptions::default(),
        )
    });
    assert!(!connect_class.same(&config_class));
    assert!(connect_class.same(&connect_class.clone()));

    let module = DatabaseModule::register_async(
        Arc::new(RecordingClient::new()),
        AsyncOptions::use_class(connect_class).into(),
        Some(AsyncOptions::use_class(config_class).into()),
        None,
    );
    let opts = Token::named("OPTS");
    assert_eq!(module.tokens().filter(|t| **t == opts).count(), 2);

    let err = ContainerBuilder::new()
        .with_module(module)
        .expect_err("two classes under one token");
    assert!(matches!(err, Error::DuplicateProvider { ref token } if token == "OPTS"));
}

#[tokio::test]
async fn test_factory_with_injected_settings() {
    let settings = Module::builder("SettingsModule")
        .provider(ProviderDescriptor::value(
            Token::named("DB_HOST"),
            String::from("replica.db"),
        ))
        .build()
        .into_ref();

    let connect = AsyncOptions::use_factory(vec![Token::named("DB_HOST")], |deps| async move {
        let host = deps.get::<String>(0)?;
        Ok::<_, Error>(ConnectOptions::new(host.as_str(), 5432, "app", "svc", "pw"))
    })
    .with_imports([settings]);

    let client = Arc::new(RecordingClient::new());
    let container = build(DatabaseModule::register_async(
        Arc::clone(&client),
        connect.into(),
        Some(OptionSpec::value(ConfigOptions::default())),
        None,
    ));

    let connection = container
        .get_typed::<RecordedConnection>(&DatabaseModule::connection_token())
        .await
        .expect("connection");
    assert_eq!(connection.host, "replica.db");
}

#[tokio::test]
async fn test_connect_failure_surfaces_and_is_retried() {
    let client = Arc::new(RecordingClient::new().failing_first(1));
    let container = build(DatabaseModule::register(
        Arc::clone(&client),
        sample_connect(),
        None,
        None,
    ));
    let token = DatabaseModule::connection_token();

    let err = container.get(&token).await.expect_err("first connect fails");
    assert!(matches!(err, Error::Connect { .. }));

    let connection = container
        .get_typed::<RecordedConnection>(&token)
        .await
        .expect("second connect succeeds");
    assert_eq!(connection.id, 2);
    assert_eq!(client.connect_count(), 2);
}

#[tokio::test]
async fn test_concurrent_consumers_share_one_failed_attempt() {
    let client = Arc::new(
        RecordingClient::new()
            .with_delay(Duration::from_millis(50))
            .failing_first(8),
    );
    let container = build(DatabaseModule::register(
        Arc::clone(&client),
        sample_connect(),
        None,
        None,
    ));
    let token = DatabaseModule::connection_token();

    let results = join_all((0..8).map(|_| container.get(&token))).await;

    assert_eq!(client.connect_count(), 1);
    let messages: Vec<String> = results
        .into_iter()
        .map(|result| result.expect_err("shared failure").to_string())
        .collect();
    assert!(messages.iter().all(|m| m == &messages[0]));
    assert!(messages[0].contains("connection refused (attempt 1)"));
}

#[tokio::test]
async fn test_concurrent_consumers_share_one_connection() {
    let client = Arc::new(RecordingClient::new().with_delay(Duration::from_millis(20)));
    let container = build(DatabaseModule::register(
        Arc::clone(&client),
        sample_connect(),
        None,
        None,
    ));
    let token = DatabaseModule::connection_token();

    let results = join_all((0..8).map(|_| container.get_typed::<RecordedConnection>(&token))).await;

    assert_eq!(client.connect_count(), 1);
    for result in results {
        assert_eq!(result.expect("shared connection").id, 1);
    }
    assert!(container.is_resolved(&DatabaseModule::manager_token()));
}

#[tokio::test]
async fn test_static_connect_and_config_with_absent_driver() {
    let client = Arc::new(RecordingClient::new());
    let connect = ConnectOptions::new("db", 5432, "app", "u", "p");
    let config = ConfigOptions::default().with_enhanced_functions(true);
    let container = build(DatabaseModule::register(
        Arc::clone(&client),
        connect.clone(),
        Some(config.clone()),
        None,
    ));

    let driver = container
        .get_typed::<DriverOptions>(&CategoryToken::DriverOptions.into())
        .await
        .expect("default driver options");
    assert!(driver.is_empty());

    let manager = container
        .get_typed::<ConnectionManager<RecordingClient>>(&DatabaseModule::manager_token())
        .await
        .expect("manager");
    let first = manager.connect().await.expect("first connect");
    let second = manager.connect().await.expect("second connect");

    assert_eq!(first, second);
    assert_eq!(client.connect_count(), 1);
    assert_eq!(
        client.last_options(),
        Some((connect, config, DriverOptions::default()))
    );
}
