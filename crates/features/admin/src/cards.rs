//! Dashboard cards boundary.
//!
//! The hub and the template-context builder only need this narrow surface:
//! settings propagation, asset collection, and the async publisher lifecycle.

use parking_lot::RwLock;
use qdeck_domain::config::AdminSettings;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Static assets contributed by one dashboard card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSpec {
    pub slug: String,
    pub script: Option<String>,
    pub style: Option<String>,
}

/// Registry of dashboard cards and their background publishers.
#[derive(Debug)]
pub struct CardRegistry {
    settings: RwLock<Arc<AdminSettings>>,
    cards: RwLock<Vec<CardSpec>>,
    event_cache_path: RwLock<Option<PathBuf>>,
    running: AtomicBool,
}

impl CardRegistry {
    #[must_use]
    pub fn new(settings: Arc<AdminSettings>) -> Self {
        let event_cache_path = settings.event_cache_path.clone();
        Self {
            settings: RwLock::new(settings),
            cards: RwLock::new(Vec::new()),
            event_cache_path: RwLock::new(event_cache_path),
            running: AtomicBool::new(false),
        }
    }

    pub fn register_card(&self, card: CardSpec) {
        self.cards.write().push(card);
    }

    /// Structured settings hook: store the new snapshot and reconfigure the
    /// event cache from it.
    pub fn apply_settings(&self, snapshot: &Arc<AdminSettings>) {
        *self.settings.write() = snapshot.clone();
        self.configure_event_cache(snapshot.event_cache_path.clone());
    }

    pub fn configure_event_cache(&self, path: Option<PathBuf>) {
        debug!(path = ?path, "Card event cache reconfigured");
        *self.event_cache_path.write() = path;
    }

    #[must_use]
    pub fn event_cache_path(&self) -> Option<PathBuf> {
        self.event_cache_path.read().clone()
    }

    /// Script and style URLs for every registered card, rooted at the global
    /// static segment.
    #[must_use]
    pub fn collect_assets(&self, static_segment: &str) -> (Vec<String>, Vec<String>) {
        let cards = self.cards.read();
        let scripts = cards
            .iter()
            .filter_map(|card| card.script.as_ref().map(|s| format!("{static_segment}/{s}")))
            .collect();
        let styles = cards
            .iter()
            .filter_map(|card| card.style.as_ref().map(|s| format!("{static_segment}/{s}")))
            .collect();
        (scripts, styles)
    }

    /// Start background publishers. Idempotent.
    pub async fn start_publishers(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        info!(cards = self.cards.read().len(), "Card publishers started");
    }

    /// Stop background publishers. Idempotent.
    pub async fn shutdown_publishers(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!("Card publishers stopped");
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
