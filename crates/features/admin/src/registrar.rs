use crate::discovery::AppConfig;
use parking_lot::RwLock;
use qdeck_adapter::AdminAdapter;
use tracing::trace;

/// Accumulates declared model-module lists from multiple sources (adapter
/// provided, project declared) and hands the deduplicated list to the adapter
/// for import.
///
/// Insertion order is preserved: module import side effects may be
/// order-sensitive, so first-seen wins the position and later duplicates are
/// dropped.
#[derive(Debug, Default)]
pub struct ModelRegistrar {
    modules: RwLock<Vec<String>>,
}

impl ModelRegistrar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the modules declared by an application configuration.
    pub fn add_config(&self, config: &AppConfig) {
        self.add_modules(config.models().iter().cloned());
    }

    /// Schedule the modules the adapter itself provides.
    pub fn add_adapter(&self, adapter: &dyn AdminAdapter) {
        self.add_modules(adapter.model_modules());
    }

    fn add_modules(&self, modules: impl IntoIterator<Item = String>) {
        let mut accumulated = self.modules.write();
        for module in modules {
            if !accumulated.contains(&module) {
                trace!(module = %module, "Model module scheduled for registration");
                accumulated.push(module);
            }
        }
    }

    /// The accumulated module list, in insertion order.
    #[must_use]
    pub fn modules(&self) -> Vec<String> {
        self.modules.read().clone()
    }

    /// Trigger the adapter's module-import mechanism for the accumulated list.
    ///
    /// Import semantics are entirely the adapter's; syncing the same list
    /// twice has no additional effect.
    pub fn sync_with_adapter(&self, adapter: &dyn AdminAdapter) {
        adapter.import_models(&self.modules.read());
    }

    /// Reset all accumulated state.
    pub fn clear(&self) {
        self.modules.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdeck_adapter::MemoryAdapter;

    #[test]
    fn modules_deduplicate_preserving_insertion_order() {
        let registrar = ModelRegistrar::new();
        let first = AppConfig::new("apps.alpha", "alpha")
            .with_models(["alpha.models".to_owned(), "shared.models".to_owned()]);
        let second = AppConfig::new("apps.beta", "beta")
            .with_models(["beta.models".to_owned(), "shared.models".to_owned()]);

        registrar.add_config(&first);
        registrar.add_config(&second);
        registrar.add_config(&first);

        assert_eq!(registrar.modules(), vec!["alpha.models", "shared.models", "beta.models"]);
    }

    #[test]
    fn sync_is_idempotent_through_the_adapter() {
        let registrar = ModelRegistrar::new();
        let adapter = MemoryAdapter::builder("mem").build();
        registrar.add_adapter(&adapter);

        registrar.sync_with_adapter(&adapter);
        registrar.sync_with_adapter(&adapter);

        assert_eq!(adapter.imported_modules(), adapter.model_modules());
    }

    #[test]
    fn clear_resets_accumulated_state() {
        let registrar = ModelRegistrar::new();
        let config = AppConfig::new("apps.alpha", "alpha").with_models(["alpha.models".to_owned()]);
        registrar.add_config(&config);
        assert_eq!(registrar.modules().len(), 1);

        registrar.clear();
        assert!(registrar.modules().is_empty());
    }
}
