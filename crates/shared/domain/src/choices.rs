//! Choice enumerations shared by adapters and the admin runtime.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value types a system setting may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingValueType {
    String,
    Integer,
    Boolean,
    Json,
}

impl SettingValueType {
    /// All supported value types, in declaration order.
    pub const ALL: &'static [Self] = &[Self::String, Self::Integer, Self::Boolean, Self::Json];
}

impl fmt::Display for SettingValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Json => "json",
        };
        f.write_str(label)
    }
}
