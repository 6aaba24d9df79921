//! # Admin runtime composition slice
//!
//! Everything between "an adapter and some declared models" and "a mountable
//! axum router with a navigation sidebar":
//!
//! * [`RuntimeContext`] — adapter registry + settings broker, passed by
//!   reference so test harnesses get isolation without global state.
//! * [`BootManager`] — adapter selection/validation and app-config collection.
//! * [`AdminHub`] — the live binding between one adapter and one
//!   [`AdminSite`], plus one-time startup of discovered app configs.
//! * [`RouterAggregator`] — idempotent composition of the admin router,
//!   additional routers, and the static/favicon/media mounts, with a cached
//!   admin router invalidated on registry changes.
//! * [`SidebarBuilder`] — navigation derivation merging model-registry and
//!   hand-registered view entries.

mod boot;
mod cards;
mod context;
mod context_builder;
mod discovery;
mod error;
mod hub;
mod menu;
mod middleware;
mod pages;
mod registrar;
mod router;
mod settings;
mod sidebar;
mod site;
mod system;

pub use crate::boot::BootManager;
pub use crate::cards::{CardRegistry, CardSpec};
pub use crate::context::RuntimeContext;
pub use crate::context_builder::TemplateContextBuilder;
pub use crate::discovery::{AppConfig, AppConfigCollector, AppStartup, DiscoveryService};
pub use crate::error::{AdminError, AdminResult};
pub use crate::hub::AdminHub;
pub use crate::menu::MenuBuilder;
pub use crate::middleware::SessionLayerConfig;
pub use crate::pages::PageRegistry;
pub use crate::registrar::ModelRegistrar;
pub use crate::router::{
    AdminRouter, ExtendedRouterAggregator, RouterAggregator, SiteHandle, SiteRoutes,
};
pub use crate::settings::SettingsBroker;
pub use crate::sidebar::{SidebarBuilder, SidebarKind};
pub use crate::site::AdminSite;
pub use crate::system::SystemAppConfig;
