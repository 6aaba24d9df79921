//! # Domain Models
//!
//! This crate contains pure domain types with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: no I/O, networking, or heavy logic—just data and simple helpers.

pub mod choices;
pub mod config;
pub mod constants;
pub mod registry;

use crate::constants::{PERM_ADD, PERM_CHANGE, PERM_DELETE, PERM_VIEW};
use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Permission actions a model admin may allow on its model.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct PermAction: u32 {
        const VIEW = 1 << 0;
        const ADD = 1 << 1;
        const CHANGE = 1 << 2;
        const DELETE = 1 << 3;

        const ALL = Self::VIEW.bits() | Self::ADD.bits() | Self::CHANGE.bits() | Self::DELETE.bits();
    }
}

impl From<&str> for PermAction {
    fn from(s: &str) -> Self {
        match s {
            PERM_VIEW => Self::VIEW,
            PERM_ADD => Self::ADD,
            PERM_CHANGE => Self::CHANGE,
            PERM_DELETE => Self::DELETE,
            "all" | "*" => Self::ALL,
            _ => Self::empty(),
        }
    }
}

impl From<u32> for PermAction {
    fn from(bits: u32) -> Self {
        Self::from_bits_truncate(bits)
    }
}

impl Serialize for PermAction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for PermAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Ok(Self::from_bits_retain(bits))
    }
}
