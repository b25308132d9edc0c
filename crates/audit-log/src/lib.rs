//! Append-only audit trail for inventory mutations.
//!
//! Every product and category mutation is paired with one entry here.
//! Entries carry an action-keyed payload: full entity snapshots for
//! create/update/delete, bare stock levels for the stock movements.
//! The serialized form reproduces the collection-file shape the trail
//! has always been stored in, so existing files decode unchanged.

pub mod entry;
pub mod log;

pub use entry::{
    AuditAction, AuditDecodeError, AuditEntry, AuditEntryId, AuditPayload, EntityKind,
};
pub use log::{AuditLog, AuditStream};
