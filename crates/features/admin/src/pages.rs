use axum::Router;
use axum::routing::MethodRouter;
use parking_lot::RwLock;
use qdeck_domain::config::AdminSettings;
use qdeck_domain::registry::{PathResolution, SectionMode, SidebarItem, ViewEntry};
use tracing::trace;

/// Registry of hand-registered admin pages.
///
/// Route registration is an explicit `(path, handler, metadata)` table rather
/// than a side effect of construction; the admin site consumes the table when
/// it builds its router, so registering the same path again replaces the
/// earlier route instead of producing a duplicate-route panic at build time.
#[derive(Debug, Default)]
pub struct PageRegistry {
    entries: RwLock<Vec<ViewEntry>>,
    routes: RwLock<Vec<(String, MethodRouter)>>,
    public: RwLock<Vec<(Router, String)>>,
}

impl PageRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view entry plus the handler serving its path.
    pub fn register(&self, entry: ViewEntry, handler: MethodRouter) {
        let path = entry.path.clone();
        {
            let mut entries = self.entries.write();
            match entries.iter_mut().find(|existing| existing.path == entry.path) {
                Some(existing) => *existing = entry,
                None => entries.push(entry),
            }
        }
        self.register_route(path, handler);
    }

    /// Register a route with no sidebar metadata.
    pub fn register_route(&self, path: impl Into<String>, handler: MethodRouter) {
        let path = path.into();
        let mut routes = self.routes.write();
        match routes.iter_mut().find(|(existing, _)| *existing == path) {
            Some(slot) => {
                trace!(path = %path, "Page route replaced");
                slot.1 = handler;
            },
            None => routes.push((path, handler)),
        }
    }

    /// Register a public (unauthenticated) router mounted outside the admin
    /// prefix. An empty prefix merges at the root.
    pub fn register_public(&self, router: Router, prefix: impl Into<String>) {
        self.public.write().push((router, prefix.into()));
    }

    /// All registered view entries, in registration order.
    #[must_use]
    pub fn entries(&self) -> Vec<ViewEntry> {
        self.entries.read().clone()
    }

    /// The route table consumed by the site's router builder.
    #[must_use]
    pub fn route_table(&self) -> Vec<(String, MethodRouter)> {
        self.routes.read().clone()
    }

    /// Public routers for the extended aggregator.
    #[must_use]
    pub fn public_routers(&self) -> Vec<(Router, String)> {
        self.public.read().clone()
    }

    /// Sidebar views grouped by label, honoring the settings split.
    ///
    /// Section landing pages (a path equal to a bare section root) never
    /// appear: they are landing pages, not navigable models.
    #[must_use]
    pub fn iter_sidebar_views(
        &self,
        settings: bool,
        snapshot: &AdminSettings,
    ) -> Vec<(String, Vec<SidebarItem>)> {
        let mut groups: Vec<(String, Vec<SidebarItem>)> = Vec::new();
        for entry in self.entries.read().iter() {
            if !entry.include_in_sidebar || entry.settings != settings {
                continue;
            }
            if Self::is_section_root(&entry.path, snapshot) {
                continue;
            }
            let item = SidebarItem {
                model_name: entry
                    .path
                    .rsplit('/')
                    .find(|segment| !segment.is_empty())
                    .unwrap_or_default()
                    .to_lowercase(),
                display_name: entry.name.clone(),
                path: entry.path.clone(),
                icon: entry.icon.clone(),
                settings: entry.settings,
            };
            match groups.iter_mut().find(|(label, _)| *label == entry.label) {
                Some((_, items)) => items.push(item),
                None => groups.push((entry.label.clone(), vec![item])),
            }
        }
        groups
    }

    fn is_section_root(path: &str, snapshot: &AdminSettings) -> bool {
        let normalized = normalize_path(path);
        [&snapshot.views_prefix, &snapshot.orm_prefix, &snapshot.settings_prefix]
            .iter()
            .any(|prefix| normalize_path(prefix) == normalized)
    }

    /// Resolve a request path against the admin prefix and section prefixes.
    #[must_use]
    pub fn resolve_path(&self, path: &str, snapshot: &AdminSettings) -> PathResolution {
        let admin_prefix = snapshot.admin_prefix();
        let mut trimmed = path.to_owned();
        if !admin_prefix.is_empty() && trimmed.starts_with(&admin_prefix) {
            trimmed = trimmed[admin_prefix.len()..].to_owned();
            if !trimmed.starts_with('/') {
                trimmed = format!("/{trimmed}");
            }
        }
        let normalized_path = normalize_path(&trimmed);

        let sections = [
            (SectionMode::Views, normalize_path(&snapshot.views_prefix)),
            (SectionMode::Orm, normalize_path(&snapshot.orm_prefix)),
            (SectionMode::Settings, normalize_path(&snapshot.settings_prefix)),
        ];

        for (mode, prefix) in sections {
            if normalized_path == prefix || normalized_path.starts_with(&format!("{prefix}/")) {
                let rest = normalized_path[prefix.len()..].trim_matches('/');
                let mut segments = rest.split('/').filter(|s| !s.is_empty());
                let app_label = segments.next().map(str::to_owned);
                let model_slug = segments.next().map(str::to_owned);
                return PathResolution {
                    normalized_path,
                    section_mode: Some(mode),
                    is_settings: mode == SectionMode::Settings,
                    app_label,
                    model_slug,
                };
            }
        }

        PathResolution {
            normalized_path,
            section_mode: None,
            is_settings: false,
            app_label: None,
            model_slug: None,
        }
    }
}

fn normalize_path(path: &str) -> String {
    let cleaned = if path.starts_with('/') { path.to_owned() } else { format!("/{path}") };
    let trimmed = cleaned.trim_end_matches('/');
    if trimmed.is_empty() { "/".to_owned() } else { trimmed.to_owned() }
}
