//! # Adapter contract
//!
//! The persistence seam of the admin runtime. An adapter binds a concrete
//! storage backend to the capability contract the runtime composes against:
//! eight required model/enumeration bindings, a module-import mechanism, an
//! async lifecycle, and a delegated query surface over JSON rows.
//!
//! The runtime never inspects how an adapter executes queries; it only checks
//! that the required bindings exist (once, at boot) and delegates everything
//! else. See [`MemoryAdapter`] for the reference implementation.

mod error;
mod memory;
mod registry;

pub use crate::error::{AdapterError, AdapterResult};
pub use crate::memory::{MemoryAdapter, MemoryAdapterBuilder};
pub use crate::registry::AdapterRegistry;

use async_trait::async_trait;
use qdeck_domain::PermAction;
use qdeck_domain::choices::SettingValueType;
use qdeck_domain::registry::ModelDescriptor;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use strum_macros::EnumIter;
use tracing::trace;

/// The eight bindings every adapter must expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum BindingKind {
    UserModel,
    UserPermissionModel,
    GroupModel,
    GroupPermissionModel,
    ContentTypeModel,
    SystemSettingModel,
    PermAction,
    SettingValueType,
}

impl BindingKind {
    /// Human label used in aggregated validation errors.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UserModel => "user model",
            Self::UserPermissionModel => "user permission model",
            Self::GroupModel => "group model",
            Self::GroupPermissionModel => "group permission model",
            Self::ContentTypeModel => "content type model",
            Self::SystemSettingModel => "system setting model",
            Self::PermAction => "permission action enumeration",
            Self::SettingValueType => "setting value enumeration",
        }
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A resolved adapter binding: either a model descriptor or an enumeration.
#[derive(Debug, Clone)]
pub enum Binding {
    Model(ModelDescriptor),
    Actions(PermAction),
    ValueTypes(&'static [SettingValueType]),
}

impl Binding {
    /// The model descriptor, when the binding is model-shaped.
    #[must_use]
    pub fn as_model(&self) -> Option<&ModelDescriptor> {
        match self {
            Self::Model(model) => Some(model),
            _ => None,
        }
    }
}

/// Scope marker for a backend transaction.
///
/// The runtime only requires the primitive to exist; adapters without real
/// transaction support return a no-op scope.
#[derive(Debug)]
pub struct TransactionScope {
    adapter: String,
    committed: bool,
}

impl TransactionScope {
    #[must_use]
    pub fn begin(adapter: impl Into<String>) -> Self {
        let adapter = adapter.into();
        trace!(adapter = %adapter, "Transaction scope opened");
        Self { adapter, committed: false }
    }

    pub fn commit(mut self) {
        self.committed = true;
        trace!(adapter = %self.adapter, "Transaction scope committed");
    }
}

impl Drop for TransactionScope {
    fn drop(&mut self) {
        if !self.committed {
            trace!(adapter = %self.adapter, "Transaction scope dropped without commit");
        }
    }
}

/// Capability contract every persistence backend satisfies.
#[async_trait]
pub trait AdminAdapter: Send + Sync + fmt::Debug {
    /// Unique adapter name used for registry lookup.
    fn name(&self) -> &str;

    /// Model modules the adapter itself contributes to registration.
    fn model_modules(&self) -> Vec<String>;

    /// Typed optional accessor over the required bindings.
    fn binding(&self, kind: BindingKind) -> Option<Binding>;

    /// Import the accumulated model modules. Importing the same module list
    /// twice has no additional effect.
    fn import_models(&self, modules: &[String]);

    /// Open backend connections and prepare schema access.
    async fn initialize(&self, modules: &[String]) -> AdapterResult<()>;

    /// Close backend connections.
    async fn shutdown(&self) -> AdapterResult<()>;

    // --- query surface (delegated; existence is all the runtime checks) ---

    async fn create(&self, model: &str, data: Value) -> AdapterResult<Value>;

    async fn get(&self, model: &str, filters: &Map<String, Value>) -> AdapterResult<Value>;

    async fn get_or_none(
        &self,
        model: &str,
        filters: &Map<String, Value>,
    ) -> AdapterResult<Option<Value>> {
        match self.get(model, filters).await {
            Ok(row) => Ok(Some(row)),
            Err(AdapterError::DoesNotExist { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn filter(&self, model: &str, filters: &Map<String, Value>) -> AdapterResult<Vec<Value>>;

    async fn all(&self, model: &str) -> AdapterResult<Vec<Value>> {
        self.filter(model, &Map::new()).await
    }

    async fn count(&self, model: &str) -> AdapterResult<u64> {
        Ok(self.all(model).await?.len() as u64)
    }

    /// Stable multi-field ordering over already-fetched rows.
    fn order_by(&self, mut rows: Vec<Value>, fields: &[&str]) -> Vec<Value> {
        for field in fields.iter().rev() {
            rows.sort_by(|a, b| {
                let left = a.get(field).map(Value::to_string).unwrap_or_default();
                let right = b.get(field).map(Value::to_string).unwrap_or_default();
                left.cmp(&right)
            });
        }
        rows
    }

    async fn save(&self, model: &str, row: Value) -> AdapterResult<Value>;

    async fn delete(&self, model: &str, id: u64) -> AdapterResult<()>;

    /// Open a transaction scope around a batch of operations.
    fn transaction(&self) -> TransactionScope {
        TransactionScope::begin(self.name())
    }
}

/// Convenience accessors shared by all adapters.
pub trait AdminAdapterExt {
    /// Like [`AdminAdapter::binding`] but failing with an error that names the
    /// adapter and the missing binding.
    fn require_binding(&self, kind: BindingKind) -> AdapterResult<Binding>;

    /// Require a model-shaped binding.
    fn require_model(&self, kind: BindingKind) -> AdapterResult<ModelDescriptor>;

    /// The adapter's user model, when bound.
    fn user_model(&self) -> Option<ModelDescriptor>;
}

impl<A: AdminAdapter + ?Sized> AdminAdapterExt for A {
    fn require_binding(&self, kind: BindingKind) -> AdapterResult<Binding> {
        self.binding(kind).ok_or_else(|| AdapterError::MissingBinding {
            adapter: self.name().to_owned(),
            binding: Cow::Borrowed(kind.label()),
        })
    }

    fn require_model(&self, kind: BindingKind) -> AdapterResult<ModelDescriptor> {
        match self.require_binding(kind)? {
            Binding::Model(model) => Ok(model),
            _ => Err(AdapterError::MissingBinding {
                adapter: self.name().to_owned(),
                binding: Cow::Borrowed(kind.label()),
            }),
        }
    }

    fn user_model(&self) -> Option<ModelDescriptor> {
        self.binding(BindingKind::UserModel).and_then(|binding| binding.as_model().cloned())
    }
}
