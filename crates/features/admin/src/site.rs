use crate::cards::CardRegistry;
use crate::error::AdminResult;
use crate::menu::MenuBuilder;
use crate::pages::PageRegistry;
use crate::router::SiteRoutes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use qdeck_adapter::{AdminAdapter, AdminAdapterExt, BindingKind};
use qdeck_domain::config::AdminSettings;
use qdeck_domain::registry::{MenuItem, ModelAdmin, PageKind, RegistryEntry, SidebarItem, humanize};
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::{debug, info};

/// The site-level aggregate: model registry, menu builder, page registry, and
/// dashboard cards, bound to exactly one adapter.
pub struct AdminSite {
    adapter: Arc<dyn AdminAdapter>,
    title: String,
    brand_icon: String,
    settings: RwLock<Arc<AdminSettings>>,
    model_reg: RwLock<FxHashMap<(String, String), Arc<ModelAdmin>>>,
    entries: RwLock<Vec<RegistryEntry>>,
    menu: MenuBuilder,
    pages: PageRegistry,
    cards: CardRegistry,
    /// Monotonic router-build counter; each rebuild after an invalidation
    /// bumps the generation.
    generation: AtomicUsize,
    finalized: AtomicBool,
}

impl AdminSite {
    #[must_use]
    pub fn new(
        adapter: Arc<dyn AdminAdapter>,
        title: Option<String>,
        settings: Arc<AdminSettings>,
    ) -> Arc<Self> {
        let title = title.unwrap_or_else(|| settings.site_title.clone());
        let brand_icon = settings.brand_icon.clone();
        Arc::new(Self {
            adapter,
            title,
            brand_icon,
            cards: CardRegistry::new(settings.clone()),
            settings: RwLock::new(settings),
            model_reg: RwLock::new(FxHashMap::default()),
            entries: RwLock::new(Vec::new()),
            menu: MenuBuilder::new(),
            pages: PageRegistry::new(),
            generation: AtomicUsize::new(0),
            finalized: AtomicBool::new(false),
        })
    }

    #[must_use]
    pub fn adapter(&self) -> &Arc<dyn AdminAdapter> {
        &self.adapter
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn brand_icon(&self) -> &str {
        &self.brand_icon
    }

    #[must_use]
    pub fn settings(&self) -> Arc<AdminSettings> {
        self.settings.read().clone()
    }

    #[must_use]
    pub fn menu_builder(&self) -> &MenuBuilder {
        &self.menu
    }

    #[must_use]
    pub fn pages(&self) -> &PageRegistry {
        &self.pages
    }

    #[must_use]
    pub fn cards(&self) -> &CardRegistry {
        &self.cards
    }

    /// Settings propagation from the hub: swap the snapshot and forward it to
    /// the cards subsystem through its structured hook.
    pub fn apply_settings(&self, snapshot: &Arc<AdminSettings>) {
        *self.settings.write() = snapshot.clone();
        self.cards.apply_settings(snapshot);
    }

    /// Register a model admin under `(app, slug)`.
    ///
    /// The key is lowercased; re-registration replaces the earlier binding
    /// (last write wins). A navigation entry pointing at the model's section
    /// path is registered alongside.
    pub fn register(&self, app: &str, admin: ModelAdmin, settings: bool) {
        let slug = admin.model.slug.clone();
        let entry = RegistryEntry {
            app: app.to_owned(),
            model: slug.clone(),
            name: Some(admin.verbose_name_plural().to_owned()),
            icon: admin.model.icon.clone(),
            settings,
        };
        let key = entry.key();
        let admin = Arc::new(admin);

        self.model_reg.write().insert(key.clone(), admin.clone());
        {
            let mut entries = self.entries.write();
            match entries.iter_mut().find(|existing| existing.key() == key) {
                Some(existing) => *existing = entry,
                None => entries.push(entry),
            }
        }

        let snapshot = self.settings();
        let section =
            if settings { snapshot.settings_prefix.clone() } else { snapshot.orm_prefix.clone() };
        self.menu.register_item(MenuItem {
            title: admin.verbose_name_plural().to_owned(),
            path: format!("{section}/{app}/{slug}"),
            icon: admin.model.icon.clone(),
            kind: if settings { PageKind::Settings } else { PageKind::Orm },
        });
        debug!(app = %app, model = %slug, settings, "Model admin registered");
    }

    /// Look up the registered admin for a lowercased `(app, model)` key.
    #[must_use]
    pub fn model_admin(&self, app: &str, model: &str) -> Option<Arc<ModelAdmin>> {
        self.model_reg.read().get(&(app.to_lowercase(), model.to_lowercase())).cloned()
    }

    /// All registry keys (diagnostics and tests).
    #[must_use]
    pub fn model_reg_keys(&self) -> Vec<(String, String)> {
        self.model_reg.read().keys().cloned().collect()
    }

    /// Model-registry entries, in registration order.
    #[must_use]
    pub fn view_entries(&self) -> Vec<RegistryEntry> {
        self.entries.read().clone()
    }

    /// Sidebar views contributed by the page registry.
    #[must_use]
    pub fn get_sidebar_views(&self, settings: bool) -> Vec<(String, Vec<SidebarItem>)> {
        self.pages.iter_sidebar_views(settings, &self.settings())
    }

    /// Human-formatted group label for sidebar display.
    #[must_use]
    pub fn format_app_label(&self, label: &str) -> String {
        humanize(label)
    }

    #[must_use]
    pub fn get_user_menu(&self) -> Vec<MenuItem> {
        self.menu.build_user_menu()
    }

    /// Number of completed router builds. Bumps once per (re)build, so cache
    /// holders can tell a cached router from a fresh one.
    #[must_use]
    pub fn build_generation(&self) -> usize {
        self.generation.load(Ordering::SeqCst)
    }

    /// Compose the admin router from the page route table and the model
    /// registry.
    pub fn build_site_router(&self) -> AdminResult<Router> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut router = Router::new();

        for (path, handler) in self.pages.route_table() {
            router = router.route(&path, handler);
        }

        let snapshot = self.settings();
        for entry in self.entries.read().iter() {
            let Some(admin) = self.model_reg.read().get(&entry.key()).cloned() else {
                continue;
            };
            let section =
                if entry.settings { &snapshot.settings_prefix } else { &snapshot.orm_prefix };
            let path = format!("{section}/{}/{}", entry.app, entry.model);
            router = router.route(&path, model_list_route(self.adapter.clone(), admin));
        }

        debug!(generation, "Admin site router built");
        Ok(router)
    }

    /// One-time async finalization: seed a content-type row per registered
    /// model through the adapter.
    pub async fn finalize(&self) -> AdminResult<()> {
        if self.finalized.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let content_type = self.adapter.require_model(BindingKind::ContentTypeModel)?;
        let entries = self.view_entries();
        for entry in &entries {
            let mut filters = serde_json::Map::new();
            filters.insert("app".to_owned(), json!(entry.app));
            filters.insert("model".to_owned(), json!(entry.model));
            if self.adapter.get_or_none(&content_type.slug, &filters).await?.is_none() {
                self.adapter
                    .create(
                        &content_type.slug,
                        json!({ "app": entry.app, "model": entry.model }),
                    )
                    .await?;
            }
        }
        info!(models = entries.len(), "Admin site finalized");
        Ok(())
    }
}

fn model_list_route(
    adapter: Arc<dyn AdminAdapter>,
    admin: Arc<ModelAdmin>,
) -> axum::routing::MethodRouter {
    get(move || {
        let adapter = adapter.clone();
        let admin = admin.clone();
        async move {
            let slug = admin.model.slug.clone();
            match adapter.all(&slug).await {
                Ok(objects) => Json(json!({
                    "model": slug,
                    "verbose_name_plural": admin.verbose_name_plural(),
                    "actions": admin.actions,
                    "count": objects.len(),
                    "objects": objects,
                }))
                .into_response(),
                Err(err) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
                },
            }
        }
    })
}

impl SiteRoutes for AdminSite {
    fn build_router(&self) -> AdminResult<Router> {
        self.build_site_router()
    }

    fn public_routers(&self) -> Vec<(Router, String)> {
        self.pages.public_routers()
    }
}

impl fmt::Debug for AdminSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSite")
            .field("adapter", &self.adapter.name())
            .field("title", &self.title)
            .field("models", &self.model_reg.read().len())
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}
