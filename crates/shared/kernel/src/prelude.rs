//! Convenience re-exports for downstream crates.

pub use crate::config::{ConfigError, load_config};
pub use qdeck_domain::config::{AdminSettings, ApiConfig, ServerConfig};
pub use qdeck_domain::registry::{
    MenuItem, ModelAdmin, ModelDescriptor, RegistryEntry, SidebarGroup, SidebarItem, ViewEntry,
};
