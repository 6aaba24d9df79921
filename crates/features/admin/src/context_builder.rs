use crate::error::AdminResult;
use crate::sidebar::SidebarBuilder;
use crate::site::AdminSite;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, info};

/// Assembles the per-request rendering context for admin templates.
///
/// Thin glue over path resolution and sidebar derivation; rendering itself is
/// a collaborator concern.
#[derive(Debug)]
pub struct TemplateContextBuilder {
    site: Arc<AdminSite>,
}

impl TemplateContextBuilder {
    #[must_use]
    pub fn new(site: Arc<AdminSite>) -> Self {
        Self { site }
    }

    /// Build the context value for a request at `path`.
    pub fn build(
        &self,
        path: &str,
        user: Option<&str>,
        page_title: Option<&str>,
        extra: Option<Map<String, Value>>,
    ) -> AdminResult<Value> {
        let site = &self.site;
        let snapshot = site.settings();
        let resolution = site.pages().resolve_path(path, &snapshot);
        info!(
            path = %path,
            user = user.unwrap_or("-"),
            section_mode = ?resolution.section_mode,
            "Building admin template context"
        );

        let mut is_settings = resolution.is_settings;
        if !is_settings {
            // Registries with only settings entries have no ORM section to
            // land on; default the context into the settings section then.
            let entries = site.view_entries();
            let has_orm_entries = entries.iter().any(|entry| !entry.settings);
            let has_settings_entries = entries.iter().any(|entry| entry.settings);
            if has_settings_entries && !has_orm_entries {
                is_settings = true;
                debug!(path = %path, "Context defaulted to settings section; no ORM entries");
            }
        }

        let apps = SidebarBuilder::build(site, is_settings)?;
        debug!(
            groups = apps.len(),
            entries = apps.iter().map(|group| group.models.len()).sum::<usize>(),
            is_settings,
            "Sidebar structure built"
        );

        let section_mode = resolution
            .section_mode
            .map(|mode| mode.to_string())
            .unwrap_or_else(|| if is_settings { "settings".to_owned() } else { "orm".to_owned() });

        let admin_prefix = snapshot.admin_prefix();
        let (scripts, styles) = site.cards().collect_assets(&snapshot.static_path());

        let mut ctx = json!({
            "request_path": path,
            "user": user,
            "site_title": site.title(),
            "brand_icon": site.brand_icon(),
            "prefix": admin_prefix,
            "orm_prefix": snapshot.orm_prefix,
            "settings_prefix": snapshot.settings_prefix,
            "views_prefix": snapshot.views_prefix,
            "apps": apps,
            "current_app": resolution.app_label,
            "current_model": resolution.model_slug,
            "section_mode": section_mode,
            "assets": { "js": scripts, "css": styles },
        });

        if let Some(title) = page_title {
            ctx["page_title"] = json!(title);
        }
        if let (Some(extra), Some(object)) = (extra, ctx.as_object_mut()) {
            object.extend(extra);
        }
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdeck_adapter::{AdminAdapter, MemoryAdapter};
    use qdeck_domain::config::AdminSettings;
    use qdeck_domain::registry::{ModelAdmin, ModelDescriptor};

    fn site() -> Arc<AdminSite> {
        let adapter: Arc<dyn AdminAdapter> = Arc::new(MemoryAdapter::builder("mem").build());
        AdminSite::new(adapter, None, Arc::new(AdminSettings::default()))
    }

    #[test]
    fn context_resolves_section_and_model() {
        let site = site();
        site.register("shop", ModelAdmin::new(ModelDescriptor::new("product")), false);

        let builder = TemplateContextBuilder::new(site);
        let ctx = builder.build("/admin/orm/shop/product", Some("alice"), None, None).unwrap();

        assert_eq!(ctx["section_mode"], json!("orm"));
        assert_eq!(ctx["current_app"], json!("shop"));
        assert_eq!(ctx["current_model"], json!("product"));
        assert_eq!(ctx["user"], json!("alice"));
    }

    #[test]
    fn settings_only_registry_defaults_into_settings_section() {
        let site = site();
        site.register("core", ModelAdmin::new(ModelDescriptor::new("systemsetting")), true);

        let builder = TemplateContextBuilder::new(site);
        let ctx = builder.build("/admin/", None, None, None).unwrap();
        assert_eq!(ctx["section_mode"], json!("settings"));
    }

    #[test]
    fn extra_values_and_page_title_are_merged() {
        let site = site();
        let builder = TemplateContextBuilder::new(site);

        let mut extra = Map::new();
        extra.insert("banner".to_owned(), json!("maintenance"));
        let ctx = builder.build("/admin/", None, Some("Dashboard"), Some(extra)).unwrap();

        assert_eq!(ctx["page_title"], json!("Dashboard"));
        assert_eq!(ctx["banner"], json!("maintenance"));
    }
}
