use chrono::{DateTime, Utc};
use common::{Actor, EntityId};
use record_store::Record;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditEntryId(Uuid);

impl AuditEntryId {
    /// Creates a new random audit entry ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an audit entry ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AuditEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AuditEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of entity an audit entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Product,
    Category,
}

impl EntityKind {
    /// Returns the wire spelling of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Product => "product",
            EntityKind::Category => "category",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The action recorded by an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Restock,
    RemoveStock,
}

impl AuditAction {
    /// Returns the wire spelling of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
            AuditAction::Restock => "RESTOCK",
            AuditAction::RemoveStock => "REMOVE_STOCK",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action-specific payload of an audit entry.
///
/// Snapshot actions carry full entity state as JSON; the stock
/// movements carry the bare stock level before and after. The pairing
/// of action and payload shape is fixed at construction and enforced
/// again when decoding stored entries.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditPayload {
    /// Full snapshot of the entity as created.
    Created { new_value: serde_json::Value },

    /// Full snapshots before and after the change.
    Updated {
        previous_value: serde_json::Value,
        new_value: serde_json::Value,
    },

    /// Final snapshot of the entity as it was removed or tombstoned.
    Deleted { previous_value: serde_json::Value },

    /// Stock level before and after a restock.
    Restocked { previous_value: i64, new_value: i64 },

    /// Stock level before and after a stock removal.
    StockRemoved { previous_value: i64, new_value: i64 },
}

impl AuditPayload {
    /// Full-snapshot payload for a CREATE entry.
    pub fn created<T: Serialize>(new_value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::Created {
            new_value: serde_json::to_value(new_value)?,
        })
    }

    /// Before and after snapshots for an UPDATE entry.
    pub fn updated<T: Serialize>(previous: &T, new: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::Updated {
            previous_value: serde_json::to_value(previous)?,
            new_value: serde_json::to_value(new)?,
        })
    }

    /// Final snapshot for a DELETE entry.
    pub fn deleted<T: Serialize>(previous: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::Deleted {
            previous_value: serde_json::to_value(previous)?,
        })
    }

    /// Stock levels around a RESTOCK entry.
    pub fn restocked(previous: i64, new: i64) -> Self {
        Self::Restocked {
            previous_value: previous,
            new_value: new,
        }
    }

    /// Stock levels around a REMOVE_STOCK entry.
    pub fn stock_removed(previous: i64, new: i64) -> Self {
        Self::StockRemoved {
            previous_value: previous,
            new_value: new,
        }
    }

    /// Returns the action this payload records.
    pub fn action(&self) -> AuditAction {
        match self {
            Self::Created { .. } => AuditAction::Create,
            Self::Updated { .. } => AuditAction::Update,
            Self::Deleted { .. } => AuditAction::Delete,
            Self::Restocked { .. } => AuditAction::Restock,
            Self::StockRemoved { .. } => AuditAction::RemoveStock,
        }
    }
}

/// Error produced when a stored entry's payload does not match its
/// action.
#[derive(Debug, Error)]
pub enum AuditDecodeError {
    /// A field required by the entry's action is absent.
    #[error("{action} entry is missing {field}")]
    MissingField {
        action: AuditAction,
        field: &'static str,
    },

    /// A field not defined for the entry's action is present.
    #[error("{action} entry does not take {field}")]
    UnexpectedField {
        action: AuditAction,
        field: &'static str,
    },

    /// A stock movement carried something other than integer levels.
    #[error("{action} entry requires integer stock levels")]
    NonNumericStock { action: AuditAction },
}

/// One immutable entry in the audit trail.
///
/// The timestamp is set at construction and the id is never reused;
/// entries are only ever appended. `entity_id` is a reference by value:
/// it is not validated against the referenced collection, and it keeps
/// pointing at entities that have since been deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireAuditEntry", try_from = "WireAuditEntry")]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub entity_type: EntityKind,
    pub entity_id: EntityId,
    pub payload: AuditPayload,
    pub timestamp: DateTime<Utc>,
    pub user: Actor,
}

impl AuditEntry {
    /// Creates an entry stamped with a fresh id and the current time.
    pub fn new(
        entity_type: EntityKind,
        entity_id: EntityId,
        payload: AuditPayload,
        user: Actor,
    ) -> Self {
        Self {
            id: AuditEntryId::new(),
            entity_type,
            entity_id,
            payload,
            timestamp: Utc::now(),
            user,
        }
    }

    /// Returns the action recorded by this entry.
    pub fn action(&self) -> AuditAction {
        self.payload.action()
    }
}

impl Record for AuditEntry {
    fn record_id(&self) -> EntityId {
        EntityId::from_uuid(self.id.as_uuid())
    }
}

/// Stored form of an audit entry.
///
/// Field presence follows the action: snapshot actions omit the side
/// they do not have, stock movements carry bare numbers in both value
/// slots, and a missing `user` decodes as the `"system"` actor.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAuditEntry {
    id: AuditEntryId,
    entity_type: EntityKind,
    entity_id: EntityId,
    action: AuditAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    previous_value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    new_value: Option<serde_json::Value>,
    timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<Actor>,
}

impl From<AuditEntry> for WireAuditEntry {
    fn from(entry: AuditEntry) -> Self {
        let action = entry.payload.action();
        let (previous_value, new_value) = match entry.payload {
            AuditPayload::Created { new_value } => (None, Some(new_value)),
            AuditPayload::Updated {
                previous_value,
                new_value,
            } => (Some(previous_value), Some(new_value)),
            AuditPayload::Deleted { previous_value } => (Some(previous_value), None),
            AuditPayload::Restocked {
                previous_value,
                new_value,
            }
            | AuditPayload::StockRemoved {
                previous_value,
                new_value,
            } => (Some(previous_value.into()), Some(new_value.into())),
        };

        Self {
            id: entry.id,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            action,
            previous_value,
            new_value,
            timestamp: entry.timestamp,
            user: Some(entry.user),
        }
    }
}

impl TryFrom<WireAuditEntry> for AuditEntry {
    type Error = AuditDecodeError;

    fn try_from(wire: WireAuditEntry) -> Result<Self, Self::Error> {
        let action = wire.action;
        let payload = match action {
            AuditAction::Create => {
                if wire.previous_value.is_some() {
                    return Err(AuditDecodeError::UnexpectedField {
                        action,
                        field: "previousValue",
                    });
                }
                AuditPayload::Created {
                    new_value: require(action, "newValue", wire.new_value)?,
                }
            }
            AuditAction::Update => AuditPayload::Updated {
                previous_value: require(action, "previousValue", wire.previous_value)?,
                new_value: require(action, "newValue", wire.new_value)?,
            },
            AuditAction::Delete => {
                if wire.new_value.is_some() {
                    return Err(AuditDecodeError::UnexpectedField {
                        action,
                        field: "newValue",
                    });
                }
                AuditPayload::Deleted {
                    previous_value: require(action, "previousValue", wire.previous_value)?,
                }
            }
            AuditAction::Restock => {
                let (previous_value, new_value) =
                    stock_levels(action, wire.previous_value, wire.new_value)?;
                AuditPayload::Restocked {
                    previous_value,
                    new_value,
                }
            }
            AuditAction::RemoveStock => {
                let (previous_value, new_value) =
                    stock_levels(action, wire.previous_value, wire.new_value)?;
                AuditPayload::StockRemoved {
                    previous_value,
                    new_value,
                }
            }
        };

        Ok(Self {
            id: wire.id,
            entity_type: wire.entity_type,
            entity_id: wire.entity_id,
            payload,
            timestamp: wire.timestamp,
            user: wire.user.unwrap_or_default(),
        })
    }
}

fn require(
    action: AuditAction,
    field: &'static str,
    value: Option<serde_json::Value>,
) -> Result<serde_json::Value, AuditDecodeError> {
    value.ok_or(AuditDecodeError::MissingField { action, field })
}

fn stock_levels(
    action: AuditAction,
    previous: Option<serde_json::Value>,
    new: Option<serde_json::Value>,
) -> Result<(i64, i64), AuditDecodeError> {
    let previous = require(action, "previousValue", previous)?;
    let new = require(action, "newValue", new)?;
    match (previous.as_i64(), new.as_i64()) {
        (Some(previous), Some(new)) => Ok((previous, new)),
        _ => Err(AuditDecodeError::NonNumericStock { action }),
    }
}
