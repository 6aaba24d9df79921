use std::borrow::Cow;

/// A specialized [`Result`] for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Errors surfaced by adapter implementations and the adapter registry.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AdapterError {
    /// No adapter is registered under the requested name.
    #[error("Adapter '{name}' is not registered")]
    NotFound { name: String },
    /// A required binding was requested from an adapter that does not carry it.
    #[error("Adapter '{adapter}' has no {binding} binding")]
    MissingBinding { adapter: String, binding: Cow<'static, str> },
    /// A single-row lookup matched nothing.
    #[error("No '{model}' row matched the given filters")]
    DoesNotExist { model: String },
    /// A single-row lookup matched more than one row.
    #[error("Multiple '{model}' rows matched the given filters")]
    MultipleRows { model: String },
    /// Backend storage failure.
    #[error("Storage error: {message}")]
    Storage { message: Cow<'static, str> },
}
