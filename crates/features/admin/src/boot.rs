use crate::context::RuntimeContext;
use crate::discovery::{AppConfig, AppConfigCollector};
use crate::error::{AdminError, AdminResult};
use crate::hub::AdminHub;
use crate::middleware::{SessionLayerConfig, admin_guard};
use crate::registrar::ModelRegistrar;
use axum::Router;
use axum::middleware::from_fn_with_state;
use parking_lot::RwLock;
use qdeck_adapter::{AdminAdapter, AdminAdapterExt, BindingKind};
use qdeck_domain::config::AdminSettings;
use qdeck_domain::registry::{ModelAdmin, ModelDescriptor};
use std::fmt;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{error, info};

/// Centralized application boot utilities.
///
/// State machine over the adapter slot: `{unconfigured} → {bound}`. Binding
/// happens explicitly through [`BootManager::init`] or lazily from the
/// configured default name on first adapter access.
pub struct BootManager {
    inner: Arc<BootInner>,
}

struct BootInner {
    ctx: Arc<RuntimeContext>,
    default_adapter: Option<String>,
    adapter: RwLock<Option<Arc<dyn AdminAdapter>>>,
    registrar: ModelRegistrar,
    hub: RwLock<Option<AdminHub>>,
    settings: RwLock<Arc<AdminSettings>>,
}

impl BootManager {
    /// Create a manager bound to `ctx`. `adapter_name` overrides the context's
    /// default adapter selection.
    #[must_use]
    pub fn new(ctx: &Arc<RuntimeContext>, adapter_name: Option<&str>) -> Self {
        let default_adapter =
            adapter_name.map(str::to_owned).or_else(|| ctx.default_adapter_name());
        let inner = Arc::new(BootInner {
            ctx: ctx.clone(),
            default_adapter,
            adapter: RwLock::new(None),
            registrar: ModelRegistrar::new(),
            hub: RwLock::new(None),
            settings: RwLock::new(ctx.settings().current()),
        });

        // Settings observer only refreshes the cached reference; the adapter
        // binding survives reconfiguration.
        let weak = Arc::downgrade(&inner);
        ctx.settings().register_observer(move |snapshot| {
            if let Some(inner) = weak.upgrade() {
                *inner.settings.write() = snapshot.clone();
            }
        });

        Self { inner }
    }

    /// The bound adapter, binding it lazily from the default name.
    ///
    /// # Errors
    /// Fails with a configuration error when neither an explicit nor a
    /// default adapter is available, and with a registry error when the name
    /// resolves to nothing.
    pub fn adapter(&self) -> AdminResult<Arc<dyn AdminAdapter>> {
        if let Some(adapter) = self.inner.adapter.read().clone() {
            return Ok(adapter);
        }
        let name = self
            .inner
            .default_adapter
            .clone()
            .ok_or_else(|| AdminError::configuration("Admin adapter not configured"))?;
        self.bind_adapter(&name)
    }

    fn bind_adapter(&self, name: &str) -> AdminResult<Arc<dyn AdminAdapter>> {
        let adapter = self.inner.ctx.adapters().get(name)?;
        *self.inner.adapter.write() = Some(adapter.clone());
        self.register_model_modules(&adapter);
        Ok(adapter)
    }

    fn register_model_modules(&self, adapter: &Arc<dyn AdminAdapter>) {
        self.inner.registrar.add_adapter(adapter.as_ref());
        self.inner.registrar.sync_with_adapter(adapter.as_ref());
    }

    /// Register `config` and schedule its models for adapter registration.
    pub fn register_app_config(&self, config: &AppConfig) {
        self.inner.registrar.add_config(config);
        if let Some(adapter) = self.inner.adapter.read().clone() {
            self.inner.registrar.sync_with_adapter(adapter.as_ref());
        }
    }

    /// Register an application configuration and hand it back.
    pub fn load_app_config(&self, config: AppConfig) -> AppConfig {
        self.register_app_config(&config);
        config
    }

    /// The adapter's user model, when an adapter is (or can be) bound.
    #[must_use]
    pub fn user_model(&self) -> Option<ModelDescriptor> {
        self.adapter().ok().and_then(|adapter| adapter.user_model())
    }

    /// Accumulated model modules, when an adapter is (or can be) bound.
    #[must_use]
    pub fn model_modules(&self) -> Vec<String> {
        if self.adapter().is_err() {
            return Vec::new();
        }
        self.inner.registrar.modules()
    }

    /// Resolve a `"app.model"` target to its registered admin.
    #[must_use]
    pub fn get_admin(&self, target: &str) -> Option<Arc<ModelAdmin>> {
        let (app_label, model_name) = target.split_once('.')?;
        let hub = self.inner.hub.read().clone()?;
        hub.site().model_admin(app_label, model_name)
    }

    /// The admin hub, constructed lazily against the bound adapter.
    pub fn hub(&self) -> AdminResult<AdminHub> {
        if let Some(hub) = self.inner.hub.read().clone() {
            return Ok(hub);
        }
        let adapter = self.adapter()?;
        let hub = AdminHub::with_adapter(&self.inner.ctx, adapter)?;
        *self.inner.hub.write() = Some(hub.clone());
        Ok(hub)
    }

    /// Initialize the admin application on `app`.
    ///
    /// Binds the adapter (explicit name wins over the default), validates it
    /// against the required bindings, collects application configurations
    /// from `packages`, mounts the composed admin router, and layers the
    /// guard/session middleware over the result.
    ///
    /// # Errors
    /// Fails fast with one aggregated configuration error naming every
    /// missing adapter binding, not just the first.
    pub fn init(
        &self,
        app: Router,
        adapter: Option<&str>,
        packages: &[String],
    ) -> AdminResult<Router> {
        let adapter = match adapter {
            Some(name) => self.bind_adapter(name)?,
            None => self.adapter()?,
        };
        self.validate_system_models(adapter.as_ref())?;

        let hub = self.hub()?;
        if !packages.is_empty() {
            let collector = AppConfigCollector::new(|config| {
                self.register_app_config(&config);
                Ok(())
            });
            collector.collect(hub.discovery(), packages)?;
        }

        let app = hub.init_app(app, packages)?;

        let settings = self.inner.settings.read().clone();
        let session = SessionLayerConfig {
            cookie: settings.session_cookie.clone(),
            admin_prefix: settings.admin_prefix(),
        };
        info!(adapter = %adapter.name(), packages = packages.len(), "Admin application initialized");
        Ok(app.layer(from_fn_with_state(session, admin_guard)))
    }

    /// Framework startup hook: start app configs, finalize the site, start
    /// card publishers, and initialize the adapter.
    ///
    /// An adapter that fails to initialize (e.g. missing schema) is logged
    /// with a migration hint and contained; the server still boots.
    pub async fn startup(&self) -> AdminResult<()> {
        let hub = self.hub()?;
        hub.start_app_configs().await;
        hub.site().finalize().await?;
        hub.site().cards().start_publishers().await;

        let adapter = self.adapter()?;
        let modules = self.inner.registrar.modules();
        if let Err(err) = adapter.initialize(&modules).await {
            error!(
                adapter = %adapter.name(),
                error = %err,
                "Failed to initialize the persistence adapter. Run your migrations before starting the admin."
            );
        }
        Ok(())
    }

    /// Framework shutdown hook: stop card publishers and close the adapter.
    pub async fn shutdown(&self) -> AdminResult<()> {
        let hub = self.inner.hub.read().clone();
        if let Some(hub) = hub {
            hub.site().cards().shutdown_publishers().await;
        }
        let adapter = self.inner.adapter.read().clone();
        if let Some(adapter) = adapter {
            if let Err(err) = adapter.shutdown().await {
                error!(adapter = %adapter.name(), error = %err, "Adapter shutdown failed");
            }
        }
        Ok(())
    }

    /// Restore the manager to an unconfigured state: the adapter slot,
    /// registrar, and hub reference are cleared and the settings snapshot is
    /// reloaded. Used by test harnesses to isolate adapter selection across
    /// cases.
    pub fn reset(&self) {
        *self.inner.adapter.write() = None;
        self.inner.registrar.clear();
        *self.inner.settings.write() = self.inner.ctx.settings().current();
        *self.inner.hub.write() = None;
    }

    /// Ensure the active adapter exposes every required binding.
    ///
    /// All absent bindings are collected (no short-circuit) so the aggregated
    /// error names each missing component.
    fn validate_system_models(&self, adapter: &dyn AdminAdapter) -> AdminResult<()> {
        let missing: Vec<&'static str> = BindingKind::iter()
            .filter(|kind| adapter.binding(*kind).is_none())
            .map(BindingKind::label)
            .collect();

        if missing.is_empty() {
            return Ok(());
        }
        Err(AdminError::configuration(format!(
            "Adapter '{}' is missing required system components: {}.",
            adapter.name(),
            missing.join(", ")
        )))
    }
}

impl fmt::Debug for BootManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootManager")
            .field("default_adapter", &self.inner.default_adapter)
            .field("bound", &self.inner.adapter.read().is_some())
            .field("modules", &self.inner.registrar.modules().len())
            .finish()
    }
}
