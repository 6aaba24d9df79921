//! Bundled public welcome application.
//!
//! Demonstrates both halves of the extension surface: a public router merged
//! outside the admin prefix, and an application configuration whose startup
//! hook runs through the hub.

use axum::routing::get;
use axum::{Json, Router};
use qdeck::admin::AppConfig;
use serde_json::json;
use tracing::info;

pub(crate) fn public_router() -> Router {
    Router::new().route(
        "/welcome",
        get(|| async {
            Json(json!({
                "message": "Welcome to Quarterdeck",
                "admin": "/admin",
            }))
        }),
    )
}

pub(crate) fn app_config() -> AppConfig {
    AppConfig::new("qdeck.contrib.welcome.main", "welcome").on_ready(|| async {
        info!("Welcome application ready");
        Ok(())
    })
}
