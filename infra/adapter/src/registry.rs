use crate::{AdapterError, AdapterResult, AdminAdapter};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Table of registered adapters, keyed by adapter name.
///
/// The registry is monotonic except for same-name overwrites: registering an
/// adapter under an already-taken name replaces the prior registration (last
/// write wins), which multi-adapter test harnesses rely on. There is no
/// removal operation.
#[derive(Debug, Default)]
pub struct AdapterRegistry {
    adapters: RwLock<FxHashMap<String, Arc<dyn AdminAdapter>>>,
}

impl AdapterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `adapter` under its own name, returning any displaced adapter.
    pub fn register(&self, adapter: Arc<dyn AdminAdapter>) -> Option<Arc<dyn AdminAdapter>> {
        let name = adapter.name().to_owned();
        let displaced = self.adapters.write().insert(name.clone(), adapter);
        debug!(adapter = %name, replaced = displaced.is_some(), "Adapter registered");
        displaced
    }

    /// Look up an adapter by name.
    ///
    /// # Errors
    /// Returns [`AdapterError::NotFound`] when no adapter carries `name`.
    pub fn get(&self, name: &str) -> AdapterResult<Arc<dyn AdminAdapter>> {
        self.adapters
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| AdapterError::NotFound { name: name.to_owned() })
    }

    /// Names of all registered adapters.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.adapters.read().keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.read().len()
    }
}
