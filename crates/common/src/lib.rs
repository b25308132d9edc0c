//! Shared identity types used across the inventory system.

pub mod types;

pub use types::{Actor, EntityId};
