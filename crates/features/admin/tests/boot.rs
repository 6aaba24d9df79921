use axum::Router;
use qdeck_admin::{AdminError, BootManager, RuntimeContext};
use qdeck_adapter::{AdminAdapter, BindingKind, MemoryAdapter};
use qdeck_domain::config::AdminSettings;
use std::sync::Arc;

fn context() -> Arc<RuntimeContext> {
    RuntimeContext::new(AdminSettings::default())
}

#[test]
fn init_succeeds_with_complete_binding_set() {
    let ctx = context();
    ctx.register_adapter(Arc::new(MemoryAdapter::builder("alpha").build()));

    let boot = BootManager::new(&ctx, Some("alpha"));
    boot.init(Router::new(), None, &[]).expect("boot should succeed");

    let first = boot.adapter().expect("adapter resolves");
    let second = boot.adapter().expect("adapter resolves again");
    assert!(Arc::ptr_eq(&first, &second), "adapter identity must be stable");
    assert_eq!(first.name(), "alpha");
}

#[test]
fn validation_reports_every_missing_binding() {
    let ctx = context();
    ctx.register_adapter(Arc::new(
        MemoryAdapter::builder("partial")
            .without(BindingKind::GroupModel)
            .without(BindingKind::PermAction)
            .build(),
    ));

    let boot = BootManager::new(&ctx, Some("partial"));
    let err = boot.init(Router::new(), None, &[]).expect_err("validation must fail");

    let message = err.to_string();
    assert!(matches!(err, AdminError::Configuration { .. }));
    assert!(message.contains("partial"));
    assert!(message.contains("group model"), "missing binding label absent: {message}");
    assert!(
        message.contains("permission action enumeration"),
        "missing binding label absent: {message}"
    );
}

#[test]
fn unbound_adapter_without_default_is_a_configuration_error() {
    let ctx = context();
    let boot = BootManager::new(&ctx, None);

    let err = boot.adapter().expect_err("no adapter configured");
    assert!(matches!(err, AdminError::Configuration { .. }));
}

#[test]
fn unknown_default_adapter_surfaces_registry_error() {
    let ctx = context();
    let boot = BootManager::new(&ctx, Some("ghost"));

    let err = boot.adapter().expect_err("unknown adapter name");
    assert!(matches!(err, AdminError::Adapter(_)));
}

#[test]
fn explicit_init_adapter_wins_over_default() {
    let ctx = context();
    ctx.register_adapter(Arc::new(MemoryAdapter::builder("alpha").build()));
    ctx.register_adapter(Arc::new(MemoryAdapter::builder("beta").build()));

    let boot = BootManager::new(&ctx, Some("alpha"));
    boot.init(Router::new(), Some("beta"), &[]).expect("boot should succeed");

    assert_eq!(boot.adapter().expect("adapter bound").name(), "beta");
}

#[test]
fn reset_restores_the_unconfigured_state() {
    let ctx = context();
    ctx.register_adapter(Arc::new(MemoryAdapter::builder("alpha").build()));

    let boot = BootManager::new(&ctx, Some("alpha"));
    let bound = boot.adapter().expect("adapter bound");
    assert!(!boot.model_modules().is_empty());

    boot.reset();

    // The default name survives reset, so access lazily rebinds and the
    // registrar repopulates from the adapter.
    let rebound = boot.adapter().expect("lazy rebinding after reset");
    assert!(Arc::ptr_eq(&bound, &rebound));
    assert_eq!(boot.model_modules(), bound.model_modules());
}

#[test]
fn user_model_surfaces_the_adapter_binding() {
    let ctx = context();
    ctx.register_adapter(Arc::new(MemoryAdapter::builder("alpha").build()));

    let boot = BootManager::new(&ctx, Some("alpha"));
    let user_model = boot.user_model().expect("user model bound");
    assert_eq!(user_model.slug, "adminuser");

    let boot_without = BootManager::new(&ctx, None);
    assert!(boot_without.user_model().is_none());
}

#[test]
fn get_admin_resolves_registered_targets() {
    let ctx = context();
    ctx.register_adapter(Arc::new(MemoryAdapter::builder("alpha").build()));

    let boot = BootManager::new(&ctx, Some("alpha"));
    boot.init(Router::new(), None, &[]).expect("boot");

    let admin = boot.get_admin("core.systemsetting").expect("system model registered");
    assert_eq!(admin.model.slug, "systemsetting");
    assert!(boot.get_admin("ghost.model").is_none());
    assert!(boot.get_admin("malformed-target").is_none());
}
