use crate::settings::SettingsBroker;
use parking_lot::RwLock;
use qdeck_adapter::{AdapterRegistry, AdminAdapter};
use qdeck_domain::config::AdminSettings;
use std::fmt;
use std::sync::Arc;

/// Shared runtime wiring: the adapter registry, the settings broker, and the
/// configured default adapter name.
///
/// Passed by reference into [`BootManager`](crate::BootManager) and
/// [`AdminHub`](crate::AdminHub); tests that need isolation construct
/// independent contexts instead of patching process-wide state.
pub struct RuntimeContext {
    adapters: AdapterRegistry,
    settings: SettingsBroker,
    default_adapter: RwLock<Option<String>>,
}

impl RuntimeContext {
    #[must_use]
    pub fn new(settings: AdminSettings) -> Arc<Self> {
        Arc::new(Self {
            adapters: AdapterRegistry::new(),
            settings: SettingsBroker::new(settings),
            default_adapter: RwLock::new(None),
        })
    }

    #[must_use]
    pub fn with_default_adapter(settings: AdminSettings, adapter_name: &str) -> Arc<Self> {
        let ctx = Self::new(settings);
        ctx.set_default_adapter(adapter_name);
        ctx
    }

    #[must_use]
    pub fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsBroker {
        &self.settings
    }

    /// Convenience: register an adapter into this context's registry.
    pub fn register_adapter(&self, adapter: Arc<dyn AdminAdapter>) {
        self.adapters.register(adapter);
    }

    #[must_use]
    pub fn default_adapter_name(&self) -> Option<String> {
        self.default_adapter.read().clone()
    }

    pub fn set_default_adapter(&self, name: &str) {
        *self.default_adapter.write() = Some(name.to_owned());
    }
}

impl fmt::Debug for RuntimeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeContext")
            .field("adapters", &self.adapters.names())
            .field("default_adapter", &self.default_adapter.read())
            .finish()
    }
}
