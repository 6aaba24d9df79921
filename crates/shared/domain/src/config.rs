use crate::constants::{
    DEFAULT_ADMIN_PATH, DEFAULT_MEDIA_SEGMENT, DEFAULT_ORM_PREFIX, DEFAULT_SETTINGS_PREFIX,
    DEFAULT_STATIC_SEGMENT, DEFAULT_VIEWS_PREFIX,
};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level API configuration shared across services.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub admin: AdminSettings,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Admin runtime settings snapshot.
///
/// The snapshot is replaced wholesale on reconfiguration; holders observe the
/// replacement through the settings broker and refresh any derived state.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AdminSettings {
    pub site_title: String,
    pub brand_icon: String,
    /// Prefix the admin router is mounted under.
    pub admin_path: String,
    /// Global URL segment for static assets, mounted outside `admin_path`.
    pub static_url_segment: String,
    pub static_dir: PathBuf,
    pub media_url_segment: String,
    pub media_dir: PathBuf,
    pub favicon: Option<PathBuf>,
    pub session_cookie: String,
    pub session_secret: String,
    pub orm_prefix: String,
    pub settings_prefix: String,
    pub views_prefix: String,
    pub dashboard_title: String,
    pub dashboard_icon: String,
    pub views_title: String,
    pub views_icon: String,
    pub orm_title: String,
    pub orm_icon: String,
    pub settings_title: String,
    pub settings_icon: String,
    pub logout_path: String,
    pub event_cache_path: Option<PathBuf>,
}

impl AdminSettings {
    /// Normalized static mount path: always starts with `/`, never ends with one.
    #[must_use]
    pub fn static_path(&self) -> String {
        normalize_segment(&self.static_url_segment)
    }

    /// Normalized media mount path.
    #[must_use]
    pub fn media_path(&self) -> String {
        normalize_segment(&self.media_url_segment)
    }

    /// Admin mount prefix without a trailing slash.
    #[must_use]
    pub fn admin_prefix(&self) -> String {
        let trimmed = self.admin_path.trim_end_matches('/');
        if trimmed.is_empty() { String::new() } else { normalize_segment(trimmed) }
    }
}

fn normalize_segment(segment: &str) -> String {
    let cleaned = segment.trim_matches('/');
    format!("/{cleaned}")
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 4781, ssl: None }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            site_title: "Quarterdeck Admin".to_owned(),
            brand_icon: "bi-compass".to_owned(),
            admin_path: DEFAULT_ADMIN_PATH.to_owned(),
            static_url_segment: DEFAULT_STATIC_SEGMENT.to_owned(),
            static_dir: PathBuf::from("static"),
            media_url_segment: DEFAULT_MEDIA_SEGMENT.to_owned(),
            media_dir: PathBuf::from("media"),
            favicon: None,
            session_cookie: "session".to_owned(),
            session_secret: "dev-only-change-me".to_owned(),
            orm_prefix: DEFAULT_ORM_PREFIX.to_owned(),
            settings_prefix: DEFAULT_SETTINGS_PREFIX.to_owned(),
            views_prefix: DEFAULT_VIEWS_PREFIX.to_owned(),
            dashboard_title: "Dashboard".to_owned(),
            dashboard_icon: "bi-speedometer2".to_owned(),
            views_title: "Views".to_owned(),
            views_icon: "bi-eye".to_owned(),
            orm_title: "ORM".to_owned(),
            orm_icon: "bi-diagram-3".to_owned(),
            settings_title: "Settings".to_owned(),
            settings_icon: "bi-gear".to_owned(),
            logout_path: "/logout".to_owned(),
            event_cache_path: None,
        }
    }
}
