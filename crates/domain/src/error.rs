//! Domain error types.

use common::EntityId;
use record_store::StoreError;
use thiserror::Error;

/// Errors that can occur during inventory operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The referenced entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: EntityId },

    /// A stock movement was requested with a non-positive quantity.
    #[error("invalid quantity {quantity}: stock movements must be positive")]
    InvalidQuantity { quantity: i64 },

    /// A removal asked for more stock than is available.
    #[error("insufficient stock: {requested} requested, {available} available")]
    InsufficientStock { available: i64, requested: i64 },

    /// The record store failed before the entity write completed.
    /// The failing operation persisted nothing.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The entity write persisted but the audit entry could not be
    /// appended. The mutation stands; the trail is missing one entry.
    #[error("audit append failed after write: {0}")]
    AuditAppend(#[source] StoreError),

    /// An entity snapshot could not be serialized for the audit trail.
    #[error("snapshot serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
