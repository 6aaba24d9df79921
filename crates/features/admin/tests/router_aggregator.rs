use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use qdeck_admin::{
    AdminError, AdminResult, ExtendedRouterAggregator, RouterAggregator, SiteRoutes,
};
use qdeck_domain::config::AdminSettings;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

#[derive(Debug, Default)]
struct StubSite {
    builds: AtomicUsize,
    fail: bool,
}

impl StubSite {
    fn build_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl SiteRoutes for StubSite {
    fn build_router(&self) -> AdminResult<Router> {
        if self.fail {
            return Err(AdminError::configuration("site router builder exploded"));
        }
        self.builds.fetch_add(1, Ordering::SeqCst);
        Ok(Router::new().route("/dashboard", get(|| async { "ok" })))
    }
}

fn settings() -> Arc<AdminSettings> {
    Arc::new(AdminSettings::default())
}

async fn status(app: &Router, path: &str) -> StatusCode {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    response.status()
}

#[tokio::test]
async fn mount_is_idempotent() {
    let site = Arc::new(StubSite::default());
    let aggregator = RouterAggregator::new(site.clone(), "/admin", settings());

    let app = aggregator.mount(Router::new()).expect("first mount");
    assert_eq!(status(&app, "/admin/dashboard").await, StatusCode::OK);

    let app = aggregator.mount(app).expect("second mount");
    assert_eq!(site.build_count(), 1, "site router builder must run exactly once");
    assert_eq!(status(&app, "/admin/dashboard").await, StatusCode::OK);
}

#[tokio::test]
async fn additional_routers_mount_at_their_prefixes() {
    let site = Arc::new(StubSite::default());
    let aggregator = RouterAggregator::new(site, "/admin", settings());
    aggregator
        .add_additional_router(Router::new().route("/reports", get(|| async { "reports" })), "/extras");

    let app = aggregator.mount(Router::new()).expect("mount");
    assert_eq!(status(&app, "/extras/reports").await, StatusCode::OK);
    assert_eq!(status(&app, "/admin/dashboard").await, StatusCode::OK);
}

#[test]
fn invalidate_admin_router_rebuilds_cached_router() {
    let site = Arc::new(StubSite::default());
    let aggregator = RouterAggregator::new(site.clone(), "/admin", settings());

    aggregator.get_admin_router().expect("build");
    aggregator.get_admin_router().expect("cached");
    assert_eq!(site.build_count(), 1);

    aggregator.invalidate_admin_router();
    aggregator.get_admin_router().expect("rebuild");
    assert_eq!(site.build_count(), 2);
}

#[test]
fn builder_failures_propagate_to_the_caller() {
    let site = Arc::new(StubSite { fail: true, ..Default::default() });
    let aggregator = RouterAggregator::new(site, "/admin", settings());

    let err = aggregator.mount(Router::new()).expect_err("mount must fail loudly");
    assert!(matches!(err, AdminError::Configuration { .. }));
}

#[test]
fn extended_aggregator_orders_public_routers_first_when_asked() {
    let site = Arc::new(StubSite::default());
    let aggregator = ExtendedRouterAggregator::new(site, "/admin", settings(), true);
    aggregator.add_additional_router(Router::new().route("/welcome", get(|| async { "hi" })), "");

    let ordering = aggregator.get_routers().expect("ordering");
    assert_eq!(ordering.len(), 2);
    assert_eq!(ordering[0].1, "", "public router must come first");
    assert_eq!(ordering[1].1, "/admin");
}

#[test]
fn extended_aggregator_keeps_admin_first_otherwise() {
    let site = Arc::new(StubSite::default());
    let aggregator = ExtendedRouterAggregator::new(site, "/admin", settings(), false);
    aggregator.add_additional_router(Router::new().route("/ping", get(|| async { "pong" })), "");

    let ordering = aggregator.get_routers().expect("ordering");
    assert_eq!(ordering[0].1, "/admin");
    assert_eq!(ordering.last().expect("public entry").1, "");
}

#[test]
fn extended_aggregator_invalidation_resets_aggregate_router() {
    let site = Arc::new(StubSite::default());
    let aggregator = ExtendedRouterAggregator::new(site.clone(), "/admin", settings(), true);

    aggregator.router().expect("first combined router");
    aggregator.router().expect("cached combined router");
    assert_eq!(site.build_count(), 1);

    aggregator.invalidate_admin_router();
    aggregator.router().expect("rebuilt combined router");
    assert_eq!(site.build_count(), 2);
}

#[tokio::test]
async fn extended_mount_serves_public_and_admin_routes() {
    let site = Arc::new(StubSite::default());
    let aggregator = ExtendedRouterAggregator::new(site, "/admin", settings(), true);
    aggregator.add_additional_router(Router::new().route("/welcome", get(|| async { "hi" })), "");

    let app = aggregator.mount(Router::new()).expect("mount");
    assert_eq!(status(&app, "/welcome").await, StatusCode::OK);
    assert_eq!(status(&app, "/admin/dashboard").await, StatusCode::OK);
}

#[tokio::test]
async fn static_assets_mount_at_the_global_segment() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("app.css"), "body{}").expect("asset file");
    let favicon = dir.path().join("favicon.ico");
    std::fs::write(&favicon, [0u8; 4]).expect("favicon file");

    let snapshot = AdminSettings {
        static_url_segment: "assets/".to_owned(),
        static_dir: dir.path().to_path_buf(),
        favicon: Some(favicon),
        ..Default::default()
    };
    let site = Arc::new(StubSite::default());
    let aggregator = RouterAggregator::new(site, "/console", Arc::new(snapshot));

    let app = aggregator.mount(Router::new()).expect("mount");
    assert_eq!(status(&app, "/assets/app.css").await, StatusCode::OK);
    assert_eq!(status(&app, "/console/assets/app.css").await, StatusCode::NOT_FOUND);
    assert_eq!(status(&app, "/favicon.ico").await, StatusCode::OK);
}

#[tokio::test]
async fn absent_favicon_is_skipped_with_a_warning() {
    let dir = tempfile::tempdir().expect("tempdir");
    let snapshot = AdminSettings {
        static_dir: dir.path().to_path_buf(),
        favicon: Some(dir.path().join("missing.ico")),
        ..Default::default()
    };
    let site = Arc::new(StubSite::default());
    let aggregator = RouterAggregator::new(site, "/admin", Arc::new(snapshot));

    let app = aggregator.mount(Router::new()).expect("mount");
    assert_eq!(status(&app, "/favicon.ico").await, StatusCode::NOT_FOUND);
    assert_eq!(status(&app, "/admin/dashboard").await, StatusCode::OK);
}
