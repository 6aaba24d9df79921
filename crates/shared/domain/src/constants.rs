//! Shared string constants used across crates.

/// OpenAPI tag for host API system endpoints.
pub const SYSTEM_TAG: &str = "System";

/// Permission action names.
pub const PERM_VIEW: &str = "view";
pub const PERM_ADD: &str = "add";
pub const PERM_CHANGE: &str = "change";
pub const PERM_DELETE: &str = "delete";

/// Default admin mount prefix.
pub const DEFAULT_ADMIN_PATH: &str = "/admin";
/// Default section prefixes inside the admin mount.
pub const DEFAULT_ORM_PREFIX: &str = "/orm";
pub const DEFAULT_SETTINGS_PREFIX: &str = "/settings";
pub const DEFAULT_VIEWS_PREFIX: &str = "/views";
/// Default global static-assets segment (mounted outside the admin prefix).
pub const DEFAULT_STATIC_SEGMENT: &str = "staticfiles";
pub const DEFAULT_MEDIA_SEGMENT: &str = "media";
