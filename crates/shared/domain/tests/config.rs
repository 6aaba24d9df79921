use qdeck_domain::config::{AdminSettings, ApiConfig, ServerConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 4781);
    assert!(server.ssl.is_none());

    let admin = AdminSettings::default();
    assert_eq!(admin.admin_path, "/admin");
    assert_eq!(admin.orm_prefix, "/orm");
    assert_eq!(admin.settings_prefix, "/settings");
    assert_eq!(admin.views_prefix, "/views");
    assert_eq!(admin.static_path(), "/staticfiles");
}

#[test]
fn api_config_deserializes() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "admin": { "site_title": "Ops Console", "admin_path": "/console" }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.admin.site_title, "Ops Console");
    assert_eq!(cfg.admin.admin_prefix(), "/console");
}

#[test]
fn static_segment_is_normalized() {
    let admin = AdminSettings { static_url_segment: "assets/".to_owned(), ..Default::default() };
    assert_eq!(admin.static_path(), "/assets");

    let admin = AdminSettings { static_url_segment: "/assets".to_owned(), ..Default::default() };
    assert_eq!(admin.static_path(), "/assets");
}
