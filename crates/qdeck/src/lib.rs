//! Facade crate for Quarterdeck features and shared modules.
//! Re-exports domain/kernel primitives and wires the runtime context.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `qdeck` with the desired feature flags (`server`).
//! - Call [`init`] to build a [`RuntimeContext`] with the bundled adapters
//!   registered; hand it to a `BootManager` to mount the admin.

pub use qdeck_admin as admin;
pub use qdeck_adapter as adapter;
pub use qdeck_domain as domain;
pub use qdeck_kernel as kernel;

use qdeck_admin::RuntimeContext;
use qdeck_adapter::MemoryAdapter;
use qdeck_domain::config::ApiConfig;
use std::sync::Arc;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use qdeck_kernel::server::router::system_router;
    }
}

/// Adapter registry for runtime introspection.
pub mod adapters {
    /// Adapters bundled with this build.
    pub const ENABLED: &[&str] = &["memory"];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Default adapter name registered by [`init`].
pub const DEFAULT_ADAPTER: &str = "memory";

/// Build a runtime context from `config` with the bundled adapters registered
/// and the default adapter selected.
#[must_use]
pub fn init(config: &ApiConfig) -> Arc<RuntimeContext> {
    let ctx = RuntimeContext::with_default_adapter(config.admin.clone(), DEFAULT_ADAPTER);
    ctx.register_adapter(Arc::new(MemoryAdapter::builder(DEFAULT_ADAPTER).build()));
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_registers_the_default_adapter() {
        let ctx = init(&ApiConfig::default());
        assert_eq!(ctx.default_adapter_name().as_deref(), Some(DEFAULT_ADAPTER));
        assert!(ctx.adapters().get(DEFAULT_ADAPTER).is_ok());
        assert!(adapters::is_enabled(DEFAULT_ADAPTER));
    }
}
