//! Application-configuration discovery.
//!
//! A compiled workspace has no package-scanning step, so discovery is a
//! provider table: application crates contribute their [`AppConfig`] lists
//! under a package root, and [`DiscoveryService::discover_all`] enumerates the
//! requested roots in order.

use crate::error::AdminResult;
use async_trait::async_trait;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

type StartupFuture = Pin<Box<dyn Future<Output = AdminResult<()>> + Send>>;

/// Async startup hook of one application configuration.
#[async_trait]
pub trait AppStartup: Send + Sync {
    /// Runs exactly once per hub, after discovery and before serving.
    async fn ready(&self) -> AdminResult<()>;
}

struct ClosureStartup {
    hook: Box<dyn Fn() -> StartupFuture + Send + Sync>,
}

#[async_trait]
impl AppStartup for ClosureStartup {
    async fn ready(&self) -> AdminResult<()> {
        (self.hook)().await
    }
}

/// A discovered application module's registration descriptor.
///
/// Keyed by `import_path`; registration into the hub is idempotent per path
/// and startup runs exactly once per hub instance.
#[derive(Clone)]
pub struct AppConfig {
    import_path: String,
    app_label: String,
    models: Vec<String>,
    startup: Option<Arc<dyn AppStartup>>,
}

impl AppConfig {
    #[must_use]
    pub fn new(import_path: impl Into<String>, app_label: impl Into<String>) -> Self {
        Self {
            import_path: import_path.into(),
            app_label: app_label.into(),
            models: Vec::new(),
            startup: None,
        }
    }

    /// Declare the model modules this application contributes.
    #[must_use]
    pub fn with_models(mut self, models: impl IntoIterator<Item = String>) -> Self {
        self.models = models.into_iter().collect();
        self
    }

    /// Attach a startup hook object.
    #[must_use]
    pub fn with_startup(mut self, hook: Arc<dyn AppStartup>) -> Self {
        self.startup = Some(hook);
        self
    }

    /// Attach an async closure as the startup hook.
    #[must_use]
    pub fn on_ready<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AdminResult<()>> + Send + 'static,
    {
        self.startup =
            Some(Arc::new(ClosureStartup { hook: Box::new(move || Box::pin(hook())) }));
        self
    }

    /// Stable unique key.
    #[must_use]
    pub fn import_path(&self) -> &str {
        &self.import_path
    }

    #[must_use]
    pub fn app_label(&self) -> &str {
        &self.app_label
    }

    #[must_use]
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Invoke the startup hook, if any. Failures surface as startup errors
    /// carrying the import path; the hub contains them per config.
    pub async fn ready(&self) -> AdminResult<()> {
        let Some(hook) = &self.startup else {
            return Ok(());
        };
        hook.ready().await.map_err(|err| match err {
            startup @ crate::error::AdminError::Startup { .. } => startup,
            other => crate::error::AdminError::startup(self.import_path.clone(), other.to_string()),
        })
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("import_path", &self.import_path)
            .field("app_label", &self.app_label)
            .field("models", &self.models)
            .field("startup", &self.startup.is_some())
            .finish()
    }
}

/// Provider table mapping package roots to contributed app configurations.
#[derive(Debug, Default)]
pub struct DiscoveryService {
    packages: RwLock<FxHashMap<String, Vec<AppConfig>>>,
}

impl DiscoveryService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Contribute configurations under `package`. Later calls append.
    pub fn provide(&self, package: impl Into<String>, configs: Vec<AppConfig>) {
        let package = package.into();
        debug!(package = %package, configs = configs.len(), "Application configurations provided");
        self.packages.write().entry(package).or_default().extend(configs);
    }

    /// Enumerate configurations under the given package roots, in root order.
    #[must_use]
    pub fn discover_all(&self, roots: &[String]) -> Vec<AppConfig> {
        let packages = self.packages.read();
        let mut configs = Vec::new();
        for root in roots {
            if let Some(provided) = packages.get(root) {
                configs.extend(provided.iter().cloned());
            }
        }
        configs
    }

    /// Package roots currently known to the service.
    #[must_use]
    pub fn package_roots(&self) -> Vec<String> {
        self.packages.read().keys().cloned().collect()
    }
}

/// Collects discovered configurations into a registration callback, the way
/// the boot sequence consumes discovery.
pub struct AppConfigCollector<'a> {
    register: Box<dyn Fn(AppConfig) -> AdminResult<()> + 'a>,
}

impl<'a> AppConfigCollector<'a> {
    pub fn new(register: impl Fn(AppConfig) -> AdminResult<()> + 'a) -> Self {
        Self { register: Box::new(register) }
    }

    /// Collect every configuration under `packages`, forwarding each to the
    /// registration callback. Returns how many configurations were forwarded.
    pub fn collect(
        &self,
        discovery: &DiscoveryService,
        packages: &[String],
    ) -> AdminResult<usize> {
        let configs = discovery.discover_all(packages);
        let count = configs.len();
        for config in configs {
            (self.register)(config)?;
        }
        Ok(count)
    }
}

impl fmt::Debug for AppConfigCollector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfigCollector").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn discover_all_enumerates_roots_in_order() {
        let discovery = DiscoveryService::new();
        discovery.provide("apps.alpha", vec![AppConfig::new("apps.alpha.main", "alpha")]);
        discovery.provide("apps.beta", vec![AppConfig::new("apps.beta.main", "beta")]);

        let found = discovery
            .discover_all(&["apps.beta".to_owned(), "apps.alpha".to_owned(), "ghost".to_owned()]);
        let paths: Vec<_> = found.iter().map(|c| c.import_path().to_owned()).collect();
        assert_eq!(paths, vec!["apps.beta.main", "apps.alpha.main"]);
    }

    #[test]
    fn collector_forwards_every_discovered_config() {
        let discovery = DiscoveryService::new();
        discovery.provide(
            "apps.alpha",
            vec![
                AppConfig::new("apps.alpha.one", "alpha"),
                AppConfig::new("apps.alpha.two", "alpha"),
            ],
        );

        let seen = Mutex::new(Vec::new());
        let collector = AppConfigCollector::new(|config| {
            seen.lock().push(config.import_path().to_owned());
            Ok(())
        });
        let count = collector.collect(&discovery, &["apps.alpha".to_owned()]).expect("collect");

        assert_eq!(count, 2);
        assert_eq!(*seen.lock(), vec!["apps.alpha.one", "apps.alpha.two"]);
    }

    #[tokio::test]
    async fn ready_without_hook_is_a_no_op() {
        let config = AppConfig::new("apps.alpha.main", "alpha");
        config.ready().await.expect("hookless ready should succeed");
    }
}
