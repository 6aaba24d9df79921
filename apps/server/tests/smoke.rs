use axum::body::Body;
use axum::http::{Request, StatusCode};
use qdeck::domain::config::ApiConfig;
use qdeck_server::Server;
use tower::ServiceExt;

async fn status(server: &Server, path: &str) -> StatusCode {
    let response = server
        .router()
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    response.status()
}

#[tokio::test]
async fn composed_router_serves_every_surface() {
    let server = Server::builder().config(ApiConfig::default()).build().await.expect("build");
    server.start_admin().await.expect("startup hooks");

    assert_eq!(status(&server, "/health").await, StatusCode::OK);
    assert_eq!(status(&server, "/welcome").await, StatusCode::OK);
    assert_eq!(status(&server, "/admin").await, StatusCode::OK);
    assert_eq!(status(&server, "/admin/settings/core/systemsetting").await, StatusCode::OK);
    assert_eq!(status(&server, "/definitely-not-here").await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn builder_defaults_are_applied() {
    let server = Server::builder().port(9999).build().await.expect("build");
    let _ = server.router();
}
