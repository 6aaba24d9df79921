use axum::Router;
use qdeck_admin::{AdminHub, AppConfig, RuntimeContext};
use qdeck_adapter::MemoryAdapter;
use qdeck_domain::config::AdminSettings;
use std::sync::{Arc, Mutex};

fn hub() -> (Arc<RuntimeContext>, AdminHub) {
    let ctx = RuntimeContext::with_default_adapter(AdminSettings::default(), "mem");
    ctx.register_adapter(Arc::new(MemoryAdapter::builder("mem").build()));
    let hub = AdminHub::new(&ctx).expect("hub builds");
    (ctx, hub)
}

fn packages(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_owned()).collect()
}

#[test]
fn registering_the_same_import_path_twice_is_a_no_op() {
    let (_ctx, hub) = hub();
    hub.discovery().provide("apps.demo", vec![AppConfig::new("apps.demo.main", "demo")]);

    let first = hub.autodiscover(&packages(&["apps.demo"]));
    let second = hub.autodiscover(&packages(&["apps.demo"]));

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1, "discovery returns the full list for introspection");
    assert_eq!(hub.config_paths(), vec!["apps.demo.main"]);
}

#[tokio::test]
async fn startup_hooks_run_in_registration_order_exactly_once() {
    let (_ctx, hub) = hub();
    let order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

    let configs = [("apps.one", "c1"), ("apps.two", "c2"), ("apps.three", "c3")]
        .into_iter()
        .map(|(path, tag)| {
            let order = order.clone();
            AppConfig::new(path, tag).on_ready(move || {
                let order = order.clone();
                async move {
                    order.lock().expect("order lock").push(tag);
                    Ok(())
                }
            })
        })
        .collect::<Vec<_>>();
    hub.discovery().provide("apps", configs);
    hub.autodiscover(&packages(&["apps"]));

    hub.start_app_configs().await;
    hub.start_app_configs().await;

    assert_eq!(*order.lock().expect("order lock"), vec!["c1", "c2", "c3"]);
    assert_eq!(hub.started_paths().len(), 3);
}

#[tokio::test]
async fn one_failing_config_does_not_abort_its_siblings() {
    let (_ctx, hub) = hub();
    let runs: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

    let ok_before = {
        let runs = runs.clone();
        AppConfig::new("apps.before", "before").on_ready(move || {
            let runs = runs.clone();
            async move {
                runs.lock().expect("runs lock").push("before");
                Ok(())
            }
        })
    };
    let failing = AppConfig::new("apps.broken", "broken")
        .on_ready(|| async { Err("subsystem unavailable".into()) });
    let ok_after = {
        let runs = runs.clone();
        AppConfig::new("apps.after", "after").on_ready(move || {
            let runs = runs.clone();
            async move {
                runs.lock().expect("runs lock").push("after");
                Ok(())
            }
        })
    };

    hub.discovery().provide("apps", vec![ok_before, failing, ok_after]);
    hub.autodiscover(&packages(&["apps"]));
    hub.start_app_configs().await;

    assert_eq!(*runs.lock().expect("runs lock"), vec!["before", "after"]);
    let mut started = hub.started_paths();
    started.sort();
    assert_eq!(started, vec!["apps.after", "apps.before"]);
}

#[test]
fn new_config_after_mount_forces_a_router_rebuild() {
    let (_ctx, hub) = hub();
    hub.discovery().provide("apps.first", vec![AppConfig::new("apps.first.main", "first")]);

    hub.init_app(Router::new(), &packages(&["apps.first"])).expect("mount");
    let generation = hub.site().build_generation();
    assert_eq!(generation, 1, "mount builds the site router exactly once");

    // Re-discovering a known config must not invalidate the cache.
    hub.autodiscover(&packages(&["apps.first"]));
    hub.router().get_admin_router().expect("cached router");
    assert_eq!(hub.site().build_generation(), generation);

    // A genuinely new config must.
    hub.discovery().provide("apps.second", vec![AppConfig::new("apps.second.main", "second")]);
    hub.autodiscover(&packages(&["apps.second"]));
    hub.router().get_admin_router().expect("rebuilt router");
    assert_eq!(hub.site().build_generation(), generation + 1);
}

#[test]
fn settings_update_invalidates_a_live_router_cache() {
    let (ctx, hub) = hub();

    hub.router().get_admin_router().expect("initial build");
    let generation = hub.site().build_generation();

    let next = AdminSettings { site_title: "Renamed Console".to_owned(), ..Default::default() };
    ctx.settings().reconfigure(next);

    assert_eq!(hub.site().settings().site_title, "Renamed Console");
    hub.router().get_admin_router().expect("rebuild after reconfiguration");
    assert_eq!(hub.site().build_generation(), generation + 1);
}

#[test]
fn reset_clears_configs_and_started_state() {
    let (_ctx, hub) = hub();
    hub.discovery().provide("apps.demo", vec![AppConfig::new("apps.demo.main", "demo")]);
    hub.autodiscover(&packages(&["apps.demo"]));
    assert_eq!(hub.config_paths().len(), 1);

    hub.reset();
    assert!(hub.config_paths().is_empty());
    assert!(hub.started_paths().is_empty());
}
