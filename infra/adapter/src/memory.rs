//! In-memory reference adapter.
//!
//! Carries the full binding set and a complete query surface over JSON rows.
//! Used by demos and by test harnesses that need adapters with selectively
//! missing bindings.

use crate::{AdapterError, AdapterResult, AdminAdapter, Binding, BindingKind};
use async_trait::async_trait;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use qdeck_domain::PermAction;
use qdeck_domain::choices::SettingValueType;
use qdeck_domain::registry::ModelDescriptor;
use serde_json::{Map, Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use strum::IntoEnumIterator;
use tracing::{debug, info};

/// Builder for [`MemoryAdapter`] instances.
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug)]
pub struct MemoryAdapterBuilder {
    name: String,
    modules: Vec<String>,
    missing: Vec<BindingKind>,
}

impl MemoryAdapterBuilder {
    /// Declare an adapter-provided model module.
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.modules.push(module.into());
        self
    }

    /// Drop one of the required bindings (invalid-adapter test harnesses).
    pub fn without(mut self, kind: BindingKind) -> Self {
        self.missing.push(kind);
        self
    }

    pub fn build(self) -> MemoryAdapter {
        let mut bindings = FxHashMap::default();
        for kind in BindingKind::iter() {
            if self.missing.contains(&kind) {
                continue;
            }
            bindings.insert(kind, default_binding(kind));
        }
        MemoryAdapter {
            name: self.name,
            modules: self.modules,
            imported: RwLock::new(Vec::new()),
            bindings,
            storage: RwLock::new(FxHashMap::default()),
            next_ids: RwLock::new(FxHashMap::default()),
            initialized: AtomicBool::new(false),
        }
    }
}

fn default_binding(kind: BindingKind) -> Binding {
    match kind {
        BindingKind::UserModel => Binding::Model(
            ModelDescriptor::new("adminuser")
                .with_names("Admin user", "Admin users")
                .with_icon("bi-person"),
        ),
        BindingKind::UserPermissionModel => Binding::Model(
            ModelDescriptor::new("adminuserpermission")
                .with_names("Admin user permission", "Admin user permissions")
                .with_icon("bi-person-check"),
        ),
        BindingKind::GroupModel => Binding::Model(
            ModelDescriptor::new("admingroup")
                .with_names("Admin group", "Admin groups")
                .with_icon("bi-people"),
        ),
        BindingKind::GroupPermissionModel => Binding::Model(
            ModelDescriptor::new("admingrouppermission")
                .with_names("Admin group permission", "Admin group permissions")
                .with_icon("bi-person-gear"),
        ),
        BindingKind::ContentTypeModel => Binding::Model(
            ModelDescriptor::new("contenttype")
                .with_names("Content type", "Content types")
                .with_icon("bi-collection"),
        ),
        BindingKind::SystemSettingModel => Binding::Model(
            ModelDescriptor::new("systemsetting")
                .with_names("System setting", "System settings")
                .with_icon("bi-sliders"),
        ),
        BindingKind::PermAction => Binding::Actions(PermAction::ALL),
        BindingKind::SettingValueType => Binding::ValueTypes(SettingValueType::ALL),
    }
}

/// Adapter keeping all rows in process memory.
#[derive(Debug)]
pub struct MemoryAdapter {
    name: String,
    modules: Vec<String>,
    imported: RwLock<Vec<String>>,
    bindings: FxHashMap<BindingKind, Binding>,
    storage: RwLock<FxHashMap<String, Vec<Value>>>,
    next_ids: RwLock<FxHashMap<String, u64>>,
    initialized: AtomicBool,
}

impl MemoryAdapter {
    /// Returns a builder preloaded with the full binding set and the default
    /// model modules.
    pub fn builder(name: impl Into<String>) -> MemoryAdapterBuilder {
        MemoryAdapterBuilder {
            name: name.into(),
            modules: vec![
                "qdeck.models.users".to_owned(),
                "qdeck.models.groups".to_owned(),
                "qdeck.models.content_type".to_owned(),
                "qdeck.models.setting".to_owned(),
            ],
            missing: Vec::new(),
        }
    }

    /// Modules imported through [`AdminAdapter::import_models`], in import order.
    #[must_use]
    pub fn imported_modules(&self) -> Vec<String> {
        self.imported.read().clone()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    fn matches(row: &Value, filters: &Map<String, Value>) -> bool {
        filters.iter().all(|(key, expected)| row.get(key) == Some(expected))
    }
}

#[async_trait]
impl AdminAdapter for MemoryAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn model_modules(&self) -> Vec<String> {
        self.modules.clone()
    }

    fn binding(&self, kind: BindingKind) -> Option<Binding> {
        self.bindings.get(&kind).cloned()
    }

    fn import_models(&self, modules: &[String]) {
        let mut imported = self.imported.write();
        for module in modules {
            if !imported.contains(module) {
                debug!(adapter = %self.name, module = %module, "Importing model module");
                imported.push(module.clone());
            }
        }
    }

    async fn initialize(&self, modules: &[String]) -> AdapterResult<()> {
        self.import_models(modules);
        self.initialized.store(true, Ordering::SeqCst);
        info!(adapter = %self.name, modules = modules.len(), "Memory adapter initialized");
        Ok(())
    }

    async fn shutdown(&self) -> AdapterResult<()> {
        self.initialized.store(false, Ordering::SeqCst);
        info!(adapter = %self.name, "Memory adapter shut down");
        Ok(())
    }

    async fn create(&self, model: &str, data: Value) -> AdapterResult<Value> {
        let mut row = match data {
            Value::Object(map) => Value::Object(map),
            other => {
                return Err(AdapterError::Storage {
                    message: format!("expected an object row, got {other}").into(),
                });
            },
        };
        if row.get("id").is_none() {
            let mut ids = self.next_ids.write();
            let next = ids.entry(model.to_owned()).or_insert(1);
            row["id"] = json!(*next);
            *next += 1;
        }
        self.storage.write().entry(model.to_owned()).or_default().push(row.clone());
        Ok(row)
    }

    async fn get(&self, model: &str, filters: &Map<String, Value>) -> AdapterResult<Value> {
        let matches = self.filter(model, filters).await?;
        match matches.len() {
            0 => Err(AdapterError::DoesNotExist { model: model.to_owned() }),
            1 => Ok(matches.into_iter().next().unwrap_or_default()),
            _ => Err(AdapterError::MultipleRows { model: model.to_owned() }),
        }
    }

    async fn filter(&self, model: &str, filters: &Map<String, Value>) -> AdapterResult<Vec<Value>> {
        let storage = self.storage.read();
        let rows = storage.get(model).cloned().unwrap_or_default();
        Ok(rows.into_iter().filter(|row| Self::matches(row, filters)).collect())
    }

    async fn save(&self, model: &str, row: Value) -> AdapterResult<Value> {
        let id = row.get("id").cloned();
        match id {
            None => self.create(model, row).await,
            Some(id) => {
                let mut storage = self.storage.write();
                let bucket = storage.entry(model.to_owned()).or_default();
                match bucket.iter_mut().find(|existing| existing.get("id") == Some(&id)) {
                    Some(existing) => *existing = row.clone(),
                    None => bucket.push(row.clone()),
                }
                Ok(row)
            },
        }
    }

    async fn delete(&self, model: &str, id: u64) -> AdapterResult<()> {
        let mut storage = self.storage.write();
        if let Some(bucket) = storage.get_mut(model) {
            bucket.retain(|row| row.get("id") != Some(&json!(id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AdminAdapterExt;

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let adapter = MemoryAdapter::builder("mem").build();
        let first = adapter.create("widget", json!({"name": "a"})).await.unwrap();
        let second = adapter.create("widget", json!({"name": "b"})).await.unwrap();

        assert_eq!(first["id"], json!(1));
        assert_eq!(second["id"], json!(2));
        assert_eq!(adapter.count("widget").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn get_distinguishes_missing_and_ambiguous() {
        let adapter = MemoryAdapter::builder("mem").build();
        adapter.create("widget", json!({"name": "dup"})).await.unwrap();
        adapter.create("widget", json!({"name": "dup"})).await.unwrap();

        let mut filters = Map::new();
        filters.insert("name".to_owned(), json!("ghost"));
        let err = adapter.get("widget", &filters).await.expect_err("missing row");
        assert!(matches!(err, AdapterError::DoesNotExist { .. }));
        assert!(adapter.get_or_none("widget", &filters).await.unwrap().is_none());

        filters.insert("name".to_owned(), json!("dup"));
        let err = adapter.get("widget", &filters).await.expect_err("ambiguous row");
        assert!(matches!(err, AdapterError::MultipleRows { .. }));
    }

    #[tokio::test]
    async fn save_replaces_row_with_matching_id() {
        let adapter = MemoryAdapter::builder("mem").build();
        let row = adapter.create("widget", json!({"name": "a"})).await.unwrap();

        let mut updated = row.clone();
        updated["name"] = json!("b");
        adapter.save("widget", updated).await.unwrap();

        let rows = adapter.all("widget").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], json!("b"));

        adapter.delete("widget", 1).await.unwrap();
        assert_eq!(adapter.count("widget").await.unwrap(), 0);
    }

    #[test]
    fn import_models_deduplicates_preserving_order() {
        let adapter = MemoryAdapter::builder("mem").build();
        let modules =
            vec!["app.models".to_owned(), "other.models".to_owned(), "app.models".to_owned()];
        adapter.import_models(&modules);
        adapter.import_models(&modules);

        assert_eq!(adapter.imported_modules(), vec!["app.models", "other.models"]);
    }

    #[test]
    fn missing_binding_is_reported_by_name() {
        let adapter = MemoryAdapter::builder("mem").without(BindingKind::GroupModel).build();
        assert!(adapter.binding(BindingKind::GroupModel).is_none());

        let err = adapter.require_binding(BindingKind::GroupModel).expect_err("binding absent");
        let message = err.to_string();
        assert!(message.contains("mem"));
        assert!(message.contains("group model"));
    }
}
