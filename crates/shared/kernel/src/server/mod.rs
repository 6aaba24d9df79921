//! Host-API system routes (health and friends).

mod health;
pub mod router;

pub use router::system_router;
