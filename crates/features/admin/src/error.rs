use qdeck_adapter::AdapterError;
use std::borrow::Cow;

/// A specialized [`Result`] for admin runtime operations.
pub type AdminResult<T> = Result<T, AdminError>;

/// Errors surfaced by the admin runtime composition layer.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// Boot/runtime configuration problems. Fatal; never swallowed.
    #[error("Admin configuration error: {message}")]
    Configuration { message: Cow<'static, str> },

    /// Adapter contract failures (registry lookup, bindings, storage).
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// An application configuration failed during startup. Contained by the
    /// hub so sibling configs still run.
    #[error("Application configuration '{import_path}' failed during startup: {message}")]
    Startup { import_path: String, message: Cow<'static, str> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal admin error: {message}")]
    Internal { message: Cow<'static, str> },
}

impl AdminError {
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn startup(import_path: impl Into<String>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Startup { import_path: import_path.into(), message: message.into() }
    }
}

impl From<&'static str> for AdminError {
    fn from(s: &'static str) -> Self {
        Self::Internal { message: Cow::Borrowed(s) }
    }
}

impl From<String> for AdminError {
    fn from(s: String) -> Self {
        Self::Internal { message: Cow::Owned(s) }
    }
}
