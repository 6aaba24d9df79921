use crate::context::RuntimeContext;
use crate::discovery::{AppConfig, DiscoveryService};
use crate::error::{AdminError, AdminResult};
use crate::router::AdminRouter;
use crate::site::AdminSite;
use crate::system::SystemAppConfig;
use axum::Router;
use fxhash::FxHashSet;
use parking_lot::RwLock;
use qdeck_adapter::AdminAdapter;
use qdeck_domain::config::AdminSettings;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

/// The live binding between one adapter and one [`AdminSite`], plus
/// orchestration of discovered application configurations.
///
/// App configs are keyed by import path: re-registering a known path is a
/// no-op, and each config's startup hook runs exactly once per hub instance,
/// in registration order.
#[derive(Clone)]
pub struct AdminHub {
    inner: Arc<HubInner>,
}

struct HubInner {
    site: Arc<AdminSite>,
    discovery: DiscoveryService,
    configs: RwLock<Vec<AppConfig>>,
    started: RwLock<FxHashSet<String>>,
    router: RwLock<Option<Arc<AdminRouter>>>,
    settings: RwLock<Arc<AdminSettings>>,
}

impl AdminHub {
    /// Build a hub against the context's default adapter.
    pub fn new(ctx: &Arc<RuntimeContext>) -> AdminResult<Self> {
        let name = ctx
            .default_adapter_name()
            .ok_or_else(|| AdminError::configuration("Admin adapter not configured"))?;
        let adapter = ctx.adapters().get(&name)?;
        Self::with_adapter(ctx, adapter)
    }

    /// Build a hub against an explicitly supplied adapter.
    pub fn with_adapter(
        ctx: &Arc<RuntimeContext>,
        adapter: Arc<dyn AdminAdapter>,
    ) -> AdminResult<Self> {
        Self::build(ctx, adapter, None)
    }

    /// Build a hub with an explicit site title.
    pub fn with_title(
        ctx: &Arc<RuntimeContext>,
        adapter: Arc<dyn AdminAdapter>,
        title: impl Into<String>,
    ) -> AdminResult<Self> {
        Self::build(ctx, adapter, Some(title.into()))
    }

    fn build(
        ctx: &Arc<RuntimeContext>,
        adapter: Arc<dyn AdminAdapter>,
        title: Option<String>,
    ) -> AdminResult<Self> {
        let settings = ctx.settings().current();
        let site = AdminSite::new(adapter, title, settings.clone());
        SystemAppConfig::new(settings.clone()).ready(&site)?;

        let inner = Arc::new(HubInner {
            site,
            discovery: DiscoveryService::new(),
            configs: RwLock::new(Vec::new()),
            started: RwLock::new(FxHashSet::default()),
            router: RwLock::new(None),
            settings: RwLock::new(settings),
        });

        let weak = Arc::downgrade(&inner);
        ctx.settings().register_observer(move |snapshot| {
            if let Some(inner) = weak.upgrade() {
                HubInner::handle_settings_update(&inner, snapshot);
            }
        });

        info!(adapter = %inner.site.adapter().name(), "Admin hub initialized");
        Ok(Self { inner })
    }

    #[must_use]
    pub fn site(&self) -> &Arc<AdminSite> {
        &self.inner.site
    }

    #[must_use]
    pub fn discovery(&self) -> &DiscoveryService {
        &self.inner.discovery
    }

    /// Discover application configurations under `packages` and register the
    /// ones not yet known by import path.
    ///
    /// When any genuinely new config was inserted the router cache is
    /// invalidated, since a new config may introduce routers or menu entries
    /// that must be re-aggregated. The full discovered list is returned
    /// regardless of novelty, for caller introspection.
    pub fn autodiscover(&self, packages: &[String]) -> Vec<AppConfig> {
        if packages.is_empty() {
            return Vec::new();
        }
        let configs = self.inner.discovery.discover_all(packages);
        let mut new_config_registered = false;
        {
            let mut known = self.inner.configs.write();
            for config in &configs {
                if known.iter().any(|c| c.import_path() == config.import_path()) {
                    continue;
                }
                debug!(import_path = %config.import_path(), "Application configuration registered");
                known.push(config.clone());
                new_config_registered = true;
            }
        }
        if new_config_registered {
            self.invalidate_router_cache();
        }
        configs
    }

    /// Convenience shortcut: autodiscover followed by mounting the admin.
    pub fn init_app(&self, app: Router, packages: &[String]) -> AdminResult<Router> {
        if !packages.is_empty() {
            self.autodiscover(packages);
        }
        self.router().mount(app)
    }

    /// Invoke startup hooks for registered configurations, in registration
    /// order.
    ///
    /// A failing hook is logged with its import path and skipped; the
    /// remaining configs still run and the process continues booting. Started
    /// paths are remembered, so re-invocation (e.g. on router remounts) is a
    /// no-op for them.
    pub async fn start_app_configs(&self) {
        let configs = self.inner.configs.read().clone();
        for config in configs {
            let path = config.import_path().to_owned();
            if self.inner.started.read().contains(&path) {
                continue;
            }
            match config.ready().await {
                Ok(()) => {
                    self.inner.started.write().insert(path);
                },
                Err(err) => {
                    error!(
                        import_path = %path,
                        error = %err,
                        "Application configuration failed during startup"
                    );
                },
            }
        }
    }

    /// The router wrapper, constructed lazily exactly once unless invalidated.
    #[must_use]
    pub fn router(&self) -> Arc<AdminRouter> {
        let mut slot = self.inner.router.write();
        slot.get_or_insert_with(|| {
            let settings = self.inner.settings.read().clone();
            Arc::new(AdminRouter::new(self.inner.site.clone(), settings))
        })
        .clone()
    }

    /// Drop cached routing state so future mounts rebuild discovery state.
    ///
    /// The aggregator owns the admin-router cache; it is asked to drop it,
    /// then the wrapper itself is dropped so static-mount bookkeeping restarts
    /// on next access.
    pub fn invalidate_router_cache(&self) {
        HubInner::invalidate_router(&self.inner);
    }

    /// Registered import paths, in registration order.
    #[must_use]
    pub fn config_paths(&self) -> Vec<String> {
        self.inner.configs.read().iter().map(|c| c.import_path().to_owned()).collect()
    }

    /// Import paths whose startup hook has completed.
    #[must_use]
    pub fn started_paths(&self) -> Vec<String> {
        self.inner.started.read().iter().cloned().collect()
    }

    /// Full hub reset: configs, started set, and cached router are cleared.
    pub fn reset(&self) {
        self.inner.configs.write().clear();
        self.inner.started.write().clear();
        HubInner::invalidate_router(&self.inner);
    }
}

impl HubInner {
    fn handle_settings_update(inner: &Arc<Self>, snapshot: &Arc<AdminSettings>) {
        *inner.settings.write() = snapshot.clone();
        inner.site.apply_settings(snapshot);
        Self::invalidate_router(inner);
    }

    fn invalidate_router(inner: &Arc<Self>) {
        let mut slot = inner.router.write();
        if let Some(router) = slot.as_ref() {
            router.aggregator().invalidate_admin_router();
        }
        *slot = None;
    }
}

impl fmt::Debug for AdminHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminHub")
            .field("adapter", &self.inner.site.adapter().name())
            .field("configs", &self.inner.configs.read().len())
            .field("started", &self.inner.started.read().len())
            .field("router_cached", &self.inner.router.read().is_some())
            .finish()
    }
}
