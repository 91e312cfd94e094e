//! Unit tests for import aggregation

use std::collections::HashSet;

use dbinject_domain::{ConfigOptions, ConnectOptions, DriverOptions};
use dbinject_infrastructure::di::{
    AsyncOptions, DeclaresImports, Module, ModuleRef, OptionSpec, aggregate_imports,
};

fn module(name: &str) -> ModuleRef {
    Module::builder(name).build().into_ref()
}

#[test]
fn test_union_deduplicates_by_reference() {
    let secrets = module("SecretsModule");
    let config = module("ConfigModule");

    let connect: OptionSpec<ConnectOptions> = AsyncOptions::use_existing("SECRETS")
        .with_imports([secrets.clone(), config.clone()])
        .into();
    let driver: OptionSpec<DriverOptions> = AsyncOptions::use_existing("SECRETS")
        .with_imports([secrets.clone()])
        .into();

    let imports = aggregate_imports([
        Some(&connect as &dyn DeclaresImports),
        Some(&driver as &dyn DeclaresImports),
    ]);

    assert_eq!(imports.len(), 2);
    assert!(imports.contains(&secrets));
    assert!(imports.contains(&config));
}

#[test]
fn test_overlapping_imports_form_a_set() {
    let x = module("X");
    let y = module("Y");
    let z = module("Z");

    let connect: AsyncOptions<ConnectOptions> =
        AsyncOptions::use_existing("P").with_imports([x.clone(), y.clone()]);
    let config: AsyncOptions<ConfigOptions> =
        AsyncOptions::use_existing("P").with_imports([y.clone(), z.clone()]);

    let forward = aggregate_imports([
        Some(&connect as &dyn DeclaresImports),
        Some(&config as &dyn DeclaresImports),
        None,
    ]);
    let reversed = aggregate_imports([
        None,
        Some(&config as &dyn DeclaresImports),
        Some(&connect as &dyn DeclaresImports),
    ]);

    let expected: HashSet<ModuleRef> = [x, y, z].into_iter().collect();
    assert_eq!(forward, expected);
    assert_eq!(reversed, expected);
}

#[test]
fn test_equal_contents_are_not_merged() {
    let first = module("ConfigModule");
    let second = module("ConfigModule");
    assert_ne!(first, second);

    let connect: AsyncOptions<ConnectOptions> =
        AsyncOptions::use_existing("A").with_imports([first.clone()]);
    let config: AsyncOptions<ConfigOptions> =
        AsyncOptions::use_existing("A").with_imports([second.clone()]);

    let imports = aggregate_imports([
        Some(&connect as &dyn DeclaresImports),
        Some(&config as &dyn DeclaresImports),
    ]);
    assert_eq!(imports.len(), 2);
}

#[test]
fn test_absent_and_static_specs_contribute_nothing() {
    let connect = OptionSpec::value(ConnectOptions::default());
    assert!(!connect.is_deferred());
    let imports = aggregate_imports([Some(&connect as &dyn DeclaresImports), None, None]);
    assert!(imports.is_empty());
}

#[test]
fn test_deferred_spec_without_imports_contributes_nothing() {
    let config: OptionSpec<ConfigOptions> = AsyncOptions::use_existing("VAULT").into();
    assert!(config.is_deferred());
    let imports = aggregate_imports([Some(&config as &dyn DeclaresImports)]);
    assert!(imports.is_empty());
}

#[test]
fn test_cloned_ref_is_the_same_module() {
    let original = module("SharedModule");
    let copy = original.clone();
    assert_eq!(original, copy);
    assert!(original.same(&copy));
    assert_eq!(format!("{copy:?}"), "ModuleRef(\"SharedModule\")");
}
