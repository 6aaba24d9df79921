//! Built-in system application.
//!
//! Registers what every admin deployment ships with: the dashboard menu
//! entry, the views/ORM/settings landing pages (kept out of the sidebar),
//! the logout user-menu entry, and the adapter's system models.

use crate::context_builder::TemplateContextBuilder;
use crate::error::AdminResult;
use crate::site::AdminSite;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{MethodRouter, get};
use qdeck_adapter::{AdminAdapterExt, BindingKind};
use qdeck_domain::config::AdminSettings;
use qdeck_domain::registry::{MenuItem, ModelAdmin, PageKind, ViewEntry};
use std::sync::Arc;
use tracing::debug;

/// App label the user-facing system models register under.
const ADMIN_APP: &str = "admin";
/// App label for core configuration models.
const CORE_APP: &str = "core";

/// Application configuration for the built-in system app.
#[derive(Debug)]
pub struct SystemAppConfig {
    settings: Arc<AdminSettings>,
}

impl SystemAppConfig {
    pub const LABEL: &'static str = "system";

    #[must_use]
    pub fn new(settings: Arc<AdminSettings>) -> Self {
        Self { settings }
    }

    /// Register built-in pages, menus, and system models against `site`.
    pub fn ready(&self, site: &Arc<AdminSite>) -> AdminResult<()> {
        self.register_menus(site);
        self.register_landing_pages(site);
        self.register_system_models(site)?;
        debug!(app = Self::LABEL, "System application ready");
        Ok(())
    }

    fn register_menus(&self, site: &Arc<AdminSite>) {
        let s = &self.settings;
        let menu = site.menu_builder();
        menu.register_item(MenuItem {
            title: s.dashboard_title.clone(),
            path: "/".to_owned(),
            icon: Some(s.dashboard_icon.clone()),
            kind: PageKind::View,
        });
        menu.register_item(MenuItem {
            title: s.views_title.clone(),
            path: s.views_prefix.clone(),
            icon: Some(s.views_icon.clone()),
            kind: PageKind::View,
        });
        menu.register_item(MenuItem {
            title: s.orm_title.clone(),
            path: s.orm_prefix.clone(),
            icon: Some(s.orm_icon.clone()),
            kind: PageKind::Orm,
        });
        menu.register_item(MenuItem {
            title: s.settings_title.clone(),
            path: s.settings_prefix.clone(),
            icon: Some(s.settings_icon.clone()),
            kind: PageKind::Settings,
        });
        menu.register_user_item(MenuItem {
            title: "Logout".to_owned(),
            path: s.logout_path.clone(),
            icon: Some("bi-box-arrow-right".to_owned()),
            kind: PageKind::View,
        });
    }

    fn register_landing_pages(&self, site: &Arc<AdminSite>) {
        let s = &self.settings;
        let pages = site.pages();

        pages.register_route("/", landing_route(site.clone(), "/", s.dashboard_title.clone()));
        pages.register(
            ViewEntry {
                path: s.views_prefix.clone(),
                name: s.views_title.clone(),
                icon: Some(s.views_icon.clone()),
                label: "views".to_owned(),
                settings: false,
                include_in_sidebar: false,
            },
            landing_route(site.clone(), &s.views_prefix, s.views_title.clone()),
        );
        pages.register(
            ViewEntry {
                path: s.orm_prefix.clone(),
                name: s.orm_title.clone(),
                icon: Some(s.orm_icon.clone()),
                label: "orm".to_owned(),
                settings: false,
                include_in_sidebar: false,
            },
            landing_route(site.clone(), &s.orm_prefix, s.orm_title.clone()),
        );
        pages.register(
            ViewEntry {
                path: s.settings_prefix.clone(),
                name: s.settings_title.clone(),
                icon: Some(s.settings_icon.clone()),
                label: "settings".to_owned(),
                settings: true,
                include_in_sidebar: false,
            },
            landing_route(site.clone(), &s.settings_prefix, s.settings_title.clone()),
        );
    }

    fn register_system_models(&self, site: &Arc<AdminSite>) -> AdminResult<()> {
        let adapter = site.adapter().clone();
        let admin_models = [
            BindingKind::UserModel,
            BindingKind::UserPermissionModel,
            BindingKind::GroupModel,
            BindingKind::GroupPermissionModel,
        ];
        for kind in admin_models {
            let descriptor = adapter.require_model(kind)?;
            site.register(ADMIN_APP, ModelAdmin::new(descriptor), true);
        }

        let content_type = adapter.require_model(BindingKind::ContentTypeModel)?;
        site.register(CORE_APP, ModelAdmin::new(content_type), true);
        let system_setting = adapter.require_model(BindingKind::SystemSettingModel)?;
        site.register(CORE_APP, ModelAdmin::new(system_setting), true);
        Ok(())
    }
}

fn landing_route(site: Arc<AdminSite>, path: &str, title: String) -> MethodRouter {
    let path = path.to_owned();
    get(move || {
        let site = site.clone();
        let path = path.clone();
        let title = title.clone();
        async move {
            let builder = TemplateContextBuilder::new(site);
            match builder.build(&path, None, Some(&title), None) {
                Ok(ctx) => Json(ctx).into_response(),
                Err(err) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
                },
            }
        }
    })
}
