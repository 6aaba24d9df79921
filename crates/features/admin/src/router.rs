//! Router aggregation.
//!
//! [`RouterAggregator`] composes one mountable unit from the site's
//! dynamically built router, additional routers with optional prefixes, and
//! the static/favicon/media mounts. The built admin router is cached until
//! explicitly invalidated; asset mounting happens exactly once per aggregator
//! regardless of registry churn.

use crate::error::AdminResult;
use axum::{Extension, Router};
use parking_lot::RwLock;
use qdeck_domain::config::AdminSettings;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tower_http::services::{ServeDir, ServeFile};
use tracing::{debug, trace, warn};

/// Seam between the aggregator and the admin site.
///
/// The aggregator treats the site as an external collaborator: it only needs
/// a router builder (which may fail, and whose failures propagate untouched)
/// and the site's public routers.
pub trait SiteRoutes: Send + Sync + fmt::Debug {
    /// Build the admin router from the current registries.
    fn build_router(&self) -> AdminResult<Router>;

    /// Public (unauthenticated) routers composed by the extended aggregator.
    fn public_routers(&self) -> Vec<(Router, String)> {
        Vec::new()
    }
}

/// The site handle stashed in request extensions at mount time, so handlers
/// and middleware can reach the site that produced the routing tree.
#[derive(Clone, Debug)]
pub struct SiteHandle(Arc<dyn SiteRoutes>);

impl SiteHandle {
    #[must_use]
    pub fn new(site: Arc<dyn SiteRoutes>) -> Self {
        Self(site)
    }

    #[must_use]
    pub fn site(&self) -> &Arc<dyn SiteRoutes> {
        &self.0
    }
}

fn mount_at(app: Router, router: Router, prefix: &str) -> Router {
    if prefix.is_empty() || prefix == "/" {
        app.merge(router)
    } else {
        app.nest(prefix, router)
    }
}

/// Idempotent composition of the admin routing tree into a host router.
pub struct RouterAggregator {
    site: Arc<dyn SiteRoutes>,
    prefix: String,
    settings: Arc<AdminSettings>,
    additional: RwLock<Vec<(Router, String)>>,
    cached: RwLock<Option<Router>>,
    mounted: AtomicBool,
    assets_mounted: AtomicBool,
}

impl RouterAggregator {
    #[must_use]
    pub fn new(
        site: Arc<dyn SiteRoutes>,
        prefix: impl Into<String>,
        settings: Arc<AdminSettings>,
    ) -> Self {
        Self {
            site,
            prefix: prefix.into(),
            settings,
            additional: RwLock::new(Vec::new()),
            cached: RwLock::new(None),
            mounted: AtomicBool::new(false),
            assets_mounted: AtomicBool::new(false),
        }
    }

    /// Register an extra router mounted at `prefix` (empty prefix merges at
    /// the root).
    pub fn add_additional_router(&self, router: Router, prefix: impl Into<String>) {
        self.additional.write().push((router, prefix.into()));
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn site(&self) -> &Arc<dyn SiteRoutes> {
        &self.site
    }

    /// The cached admin router, built on first access.
    ///
    /// # Errors
    /// Site router-builder failures propagate untouched: a misconfigured site
    /// must fail mounting loudly.
    pub fn get_admin_router(&self) -> AdminResult<Router> {
        if let Some(router) = self.cached.read().clone() {
            return Ok(router);
        }
        let router = self.site.build_router()?;
        *self.cached.write() = Some(router.clone());
        Ok(router)
    }

    /// Drop the cached admin router only. The static/favicon/media mounts are
    /// one-time regardless of registry churn and keep their bookkeeping.
    pub fn invalidate_admin_router(&self) {
        debug!("Admin router cache invalidated");
        *self.cached.write() = None;
    }

    /// Compose everything into `app`.
    ///
    /// The first call builds the admin router (the site's router builder runs
    /// exactly once), nests it at the aggregator prefix, mounts additional
    /// routers, mounts static/favicon/media, and stashes the site handle in
    /// request extensions. Subsequent calls return `app` unchanged.
    pub fn mount(&self, app: Router) -> AdminResult<Router> {
        if self.mounted.load(Ordering::SeqCst) {
            trace!("Mount skipped; aggregator already built");
            return Ok(app);
        }
        let admin = self.get_admin_router()?;
        let mut app = mount_at(app, admin, &self.prefix);
        for (router, prefix) in self.additional.read().iter() {
            app = mount_at(app, router.clone(), prefix);
        }
        app = self.mount_assets(app);
        self.mounted.store(true, Ordering::SeqCst);
        Ok(app.layer(Extension(SiteHandle::new(self.site.clone()))))
    }

    /// Static assets mount at the **global** static segment, never nested
    /// under the admin prefix, so assets stay reachable wherever the admin UI
    /// is mounted.
    fn mount_assets(&self, app: Router) -> Router {
        if self.assets_mounted.swap(true, Ordering::SeqCst) {
            return app;
        }
        let settings = &self.settings;
        let static_path = settings.static_path();
        let mut app = app.nest_service(&static_path, ServeDir::new(&settings.static_dir));
        match &settings.favicon {
            Some(favicon) if favicon.exists() => {
                app = app.route_service("/favicon.ico", ServeFile::new(favicon));
            },
            Some(favicon) => {
                warn!(favicon = %favicon.display(), "Favicon file absent; skipping mount");
            },
            None => {},
        }
        app = app.nest_service(&settings.media_path(), ServeDir::new(&settings.media_dir));
        debug!(static_path = %static_path, "Static assets mounted");
        app
    }
}

impl fmt::Debug for RouterAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterAggregator")
            .field("prefix", &self.prefix)
            .field("cached", &self.cached.read().is_some())
            .field("mounted", &self.mounted.load(Ordering::SeqCst))
            .finish()
    }
}

/// Aggregator variant that also composes public (unauthenticated) routers.
///
/// `public_first` controls whether public routers precede or follow the admin
/// router in the composition list; first-match routing semantics depend on
/// the ordering, so it is observable and preserved exactly.
#[derive(Debug)]
pub struct ExtendedRouterAggregator {
    inner: RouterAggregator,
    public_first: bool,
    combined: RwLock<Option<Router>>,
}

impl ExtendedRouterAggregator {
    #[must_use]
    pub fn new(
        site: Arc<dyn SiteRoutes>,
        prefix: impl Into<String>,
        settings: Arc<AdminSettings>,
        public_first: bool,
    ) -> Self {
        Self {
            inner: RouterAggregator::new(site, prefix, settings),
            public_first,
            combined: RwLock::new(None),
        }
    }

    /// Register a public router (merged at the root unless prefixed).
    pub fn add_additional_router(&self, router: Router, prefix: impl Into<String>) {
        self.inner.add_additional_router(router, prefix);
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        self.inner.prefix()
    }

    /// The ordered composition list: public routers and the admin router at
    /// its prefix, ordered by the `public_first` flag.
    pub fn get_routers(&self) -> AdminResult<Vec<(Router, String)>> {
        let admin = self.inner.get_admin_router()?;
        let mut public: Vec<(Router, String)> = self.inner.site.public_routers();
        public.extend(self.inner.additional.read().iter().cloned());

        let mut ordered = Vec::with_capacity(public.len() + 1);
        if self.public_first {
            ordered.extend(public);
            ordered.push((admin, self.inner.prefix.clone()));
        } else {
            ordered.push((admin, self.inner.prefix.clone()));
            ordered.extend(public);
        }
        Ok(ordered)
    }

    /// The combined router, rebuilt after invalidation.
    pub fn router(&self) -> AdminResult<Router> {
        if let Some(router) = self.combined.read().clone() {
            return Ok(router);
        }
        let mut app = Router::new();
        for (router, prefix) in self.get_routers()? {
            app = mount_at(app, router, &prefix);
        }
        *self.combined.write() = Some(app.clone());
        Ok(app)
    }

    pub fn get_admin_router(&self) -> AdminResult<Router> {
        self.inner.get_admin_router()
    }

    /// Drop both the inner admin-router cache and the combined aggregate.
    pub fn invalidate_admin_router(&self) {
        self.inner.invalidate_admin_router();
        *self.combined.write() = None;
    }

    /// Mount the ordered composition into `app` (idempotent, like
    /// [`RouterAggregator::mount`]).
    pub fn mount(&self, app: Router) -> AdminResult<Router> {
        if self.inner.mounted.load(Ordering::SeqCst) {
            trace!("Mount skipped; aggregator already built");
            return Ok(app);
        }
        let mut app = app;
        for (router, prefix) in self.get_routers()? {
            app = mount_at(app, router, &prefix);
        }
        app = self.inner.mount_assets(app);
        self.inner.mounted.store(true, Ordering::SeqCst);
        Ok(app.layer(Extension(SiteHandle::new(self.inner.site.clone()))))
    }
}

/// Thin mount/cache facade the hub holds on to.
///
/// The aggregator is the sole owner of the cached admin router; the hub drops
/// the whole wrapper to force full reconstruction (including static-mount
/// bookkeeping) on next access.
#[derive(Debug)]
pub struct AdminRouter {
    aggregator: ExtendedRouterAggregator,
}

impl AdminRouter {
    #[must_use]
    pub fn new(site: Arc<dyn SiteRoutes>, settings: Arc<AdminSettings>) -> Self {
        let prefix = settings.admin_prefix();
        Self { aggregator: ExtendedRouterAggregator::new(site, prefix, settings, true) }
    }

    #[must_use]
    pub fn aggregator(&self) -> &ExtendedRouterAggregator {
        &self.aggregator
    }

    pub fn mount(&self, app: Router) -> AdminResult<Router> {
        self.aggregator.mount(app)
    }

    pub fn get_admin_router(&self) -> AdminResult<Router> {
        self.aggregator.get_admin_router()
    }

    pub fn invalidate(&self) {
        self.aggregator.invalidate_admin_router();
    }
}
