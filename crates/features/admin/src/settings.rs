use parking_lot::RwLock;
use qdeck_domain::config::AdminSettings;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type Observer = Box<dyn Fn(&Arc<AdminSettings>) + Send + Sync>;

/// Holder of the process-wide settings snapshot.
///
/// The snapshot is replaced wholesale, never mutated field by field. Observers
/// are notified synchronously with the new snapshot so holders of derived
/// state (notably the router cache) refresh before the next request is served.
pub struct SettingsBroker {
    current: RwLock<Arc<AdminSettings>>,
    observers: RwLock<Vec<Observer>>,
}

impl SettingsBroker {
    #[must_use]
    pub fn new(initial: AdminSettings) -> Self {
        Self { current: RwLock::new(Arc::new(initial)), observers: RwLock::new(Vec::new()) }
    }

    /// The current snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<AdminSettings> {
        self.current.read().clone()
    }

    /// Replace the snapshot and synchronously notify every observer.
    pub fn reconfigure(&self, next: AdminSettings) {
        let snapshot = Arc::new(next);
        *self.current.write() = snapshot.clone();
        let observers = self.observers.read();
        debug!(observers = observers.len(), "Settings snapshot replaced");
        for observer in observers.iter() {
            observer(&snapshot);
        }
    }

    /// Register a callback receiving each full new snapshot. There are no
    /// partial-update events.
    pub fn register_observer(&self, observer: impl Fn(&Arc<AdminSettings>) + Send + Sync + 'static) {
        self.observers.write().push(Box::new(observer));
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.read().len()
    }
}

impl fmt::Debug for SettingsBroker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsBroker")
            .field("current", &self.current.read())
            .field("observers", &self.observer_count())
            .finish()
    }
}
