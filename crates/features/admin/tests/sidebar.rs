use axum::routing::get;
use qdeck_admin::{AdminSite, SidebarBuilder, SidebarKind};
use qdeck_adapter::{AdminAdapter, MemoryAdapter};
use qdeck_domain::config::AdminSettings;
use qdeck_domain::registry::{ModelAdmin, ModelDescriptor, ViewEntry};
use std::sync::Arc;

fn site() -> Arc<AdminSite> {
    let adapter: Arc<dyn AdminAdapter> = Arc::new(MemoryAdapter::builder("mem").build());
    AdminSite::new(adapter, Some("Regression Admin".to_owned()), Arc::new(AdminSettings::default()))
}

fn view(path: &str, name: &str, label: &str, settings: bool) -> ViewEntry {
    ViewEntry {
        path: path.to_owned(),
        name: name.to_owned(),
        icon: Some("bi-list".to_owned()),
        label: label.to_owned(),
        settings,
        include_in_sidebar: true,
    }
}

async fn noop() {}

#[test]
fn merge_groups_models_and_views_and_reconciles_slugs() {
    let site = site();
    site.register(
        "core",
        ModelAdmin::new(
            ModelDescriptor::new("systemsetting").with_names("System setting", "System settings"),
        ),
        false,
    );
    site.pages().register(view("/views/demo/list", "Demo List", "demo", false), get(noop));
    // The bare section root must never surface as a sidebar leaf.
    site.pages().register(view("/views", "Views", "views", false), get(noop));

    let groups = SidebarBuilder::build(&site, false).expect("sidebar builds");
    let labels: Vec<&str> = groups.iter().map(|group| group.label.as_str()).collect();

    assert!(labels.contains(&"core"));
    assert!(labels.contains(&"demo"));
    assert!(!labels.contains(&"views"));

    let core = groups.iter().find(|group| group.label == "core").expect("core group");
    assert_eq!(core.models[0].display_name, "System settings");
    assert_eq!(core.models[0].path, "/orm/core/systemsetting");

    let demo = groups.iter().find(|group| group.label == "demo").expect("demo group");
    assert_eq!(demo.models[0].model_name, "list");
    assert_eq!(demo.models[0].path, "/views/demo/list");
}

#[test]
fn groups_and_models_sort_case_insensitively() {
    let site = site();
    site.register("Zoo", ModelAdmin::new(ModelDescriptor::new("keeper")), false);
    site.register("alpha", ModelAdmin::new(ModelDescriptor::new("omega")), false);
    site.register(
        "alpha",
        ModelAdmin::new(ModelDescriptor::new("aardvark").with_names("aardvark", "aardvarks")),
        false,
    );

    let groups = SidebarBuilder::build(&site, false).expect("sidebar builds");
    let labels: Vec<&str> = groups.iter().map(|group| group.label.as_str()).collect();
    assert_eq!(labels, vec!["alpha", "Zoo"]);

    let alpha = &groups[0];
    let names: Vec<&str> = alpha.models.iter().map(|m| m.display_name.as_str()).collect();
    assert_eq!(names, vec!["aardvarks", "Omegas"]);
}

#[test]
fn settings_split_keeps_the_namespaces_apart() {
    let site = site();
    site.register("core", ModelAdmin::new(ModelDescriptor::new("systemsetting")), true);
    site.register("shop", ModelAdmin::new(ModelDescriptor::new("product")), false);
    site.pages().register(view("/settings/demo/config", "Demo Config", "demo-config", true), get(noop));

    let settings_groups = SidebarBuilder::build(&site, true).expect("settings sidebar");
    let labels: Vec<&str> = settings_groups.iter().map(|group| group.label.as_str()).collect();
    assert_eq!(labels, vec!["core", "demo-config"]);
    assert!(settings_groups.iter().all(|g| g.models.iter().all(|m| m.settings)));

    let orm_groups = SidebarBuilder::build(&site, false).expect("orm sidebar");
    let labels: Vec<&str> = orm_groups.iter().map(|group| group.label.as_str()).collect();
    assert_eq!(labels, vec!["shop"]);
}

#[test]
fn unmatched_view_paths_fall_back_to_joined_segments() {
    let site = site();
    site.pages().register(view("/custom/reports/weekly", "Weekly", "reports", false), get(noop));

    let groups = SidebarBuilder::build(&site, false).expect("sidebar builds");
    let reports = groups.iter().find(|group| group.label == "reports").expect("reports group");
    assert_eq!(reports.models[0].model_name, "custom_reports_weekly");
}

#[test]
fn collect_exposes_both_registry_kinds() {
    let site = site();
    site.register("core", ModelAdmin::new(ModelDescriptor::new("systemsetting")), true);
    site.pages().register(view("/views/demo/list", "Demo List", "demo", false), get(noop));

    let apps = SidebarBuilder::collect(&site, SidebarKind::Apps, true);
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].0, "core");

    let views = SidebarBuilder::collect(&site, SidebarKind::Views, false);
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].0, "demo");
}

#[test]
fn group_display_label_is_humanized() {
    let site = site();
    site.register("content_hub", ModelAdmin::new(ModelDescriptor::new("article")), false);

    let groups = SidebarBuilder::build(&site, false).expect("sidebar builds");
    assert_eq!(groups[0].display, "Content Hub");
}
