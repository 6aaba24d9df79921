//! Registry records shared between the admin site and the sidebar/menu builders.
//!
//! Model-backed entries ([`RegistryEntry`]) and hand-registered view entries
//! ([`ViewEntry`]) live in independent namespaces and are merged only when the
//! navigation sidebar is derived.

use crate::PermAction;
use serde::Serialize;
use std::fmt;

/// Descriptor of a persistence-backed model exposed by an adapter binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelDescriptor {
    pub slug: String,
    pub verbose_name: String,
    pub verbose_name_plural: String,
    pub icon: Option<String>,
}

impl ModelDescriptor {
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        let slug = slug.into();
        let verbose_name = humanize(&slug);
        let verbose_name_plural = format!("{verbose_name}s");
        Self { slug, verbose_name, verbose_name_plural, icon: None }
    }

    #[must_use]
    pub fn with_names(mut self, singular: impl Into<String>, plural: impl Into<String>) -> Self {
        self.verbose_name = singular.into();
        self.verbose_name_plural = plural.into();
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Admin configuration bound to one registered model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelAdmin {
    pub model: ModelDescriptor,
    pub actions: PermAction,
}

impl ModelAdmin {
    #[must_use]
    pub fn new(model: ModelDescriptor) -> Self {
        Self { model, actions: PermAction::ALL }
    }

    #[must_use]
    pub fn with_actions(mut self, actions: PermAction) -> Self {
        self.actions = actions;
        self
    }

    /// Display name preferred by navigation builders.
    #[must_use]
    pub fn verbose_name_plural(&self) -> &str {
        &self.model.verbose_name_plural
    }
}

/// One registered `(app_label, model_slug)` record in the model registry.
///
/// Keyed by the lowercased pair; re-registration under the same key replaces
/// the prior entry (last write wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    pub app: String,
    pub model: String,
    pub name: Option<String>,
    pub icon: Option<String>,
    /// Settings-section models are split from ORM-browsing models.
    pub settings: bool,
}

impl RegistryEntry {
    /// Registry key: lowercased `(app, model)`.
    #[must_use]
    pub fn key(&self) -> (String, String) {
        (self.app.to_lowercase(), self.model.to_lowercase())
    }
}

/// Sidebar metadata for one hand-registered custom view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewEntry {
    pub path: String,
    pub name: String,
    pub icon: Option<String>,
    /// Group label the entry is filed under in the sidebar.
    pub label: String,
    pub settings: bool,
    /// Landing pages opt out; they are navigable through the menu instead.
    pub include_in_sidebar: bool,
}

/// Kind of page a menu item points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    View,
    Orm,
    Settings,
}

/// One entry in the main or user navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub title: String,
    pub path: String,
    pub icon: Option<String>,
    pub kind: PageKind,
}

/// One leaf in the derived navigation sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarItem {
    pub model_name: String,
    pub display_name: String,
    pub path: String,
    pub icon: Option<String>,
    pub settings: bool,
}

/// One sidebar group: an application (or view) label plus its sorted models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarGroup {
    pub label: String,
    pub display: String,
    pub models: Vec<SidebarItem>,
}

/// Section an admin request path resolved into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionMode {
    Views,
    Orm,
    Settings,
}

impl fmt::Display for SectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Views => "views",
            Self::Orm => "orm",
            Self::Settings => "settings",
        };
        f.write_str(label)
    }
}

/// Outcome of resolving a request path against the admin section prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathResolution {
    pub normalized_path: String,
    pub section_mode: Option<SectionMode>,
    pub is_settings: bool,
    pub app_label: Option<String>,
    pub model_slug: Option<String>,
}

/// Turns a model slug into a human-readable title (`"system_setting"` → `"System Setting"`).
#[must_use]
pub fn humanize(slug: &str) -> String {
    slug.split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
