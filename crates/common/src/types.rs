use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a stored entity.
///
/// Wraps a UUID to provide type safety and prevent mixing up
/// entity IDs with other UUID-based identifiers. Products,
/// categories, and audit references all key on this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Creates a new random entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an entity ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for EntityId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<EntityId> for Uuid {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Identity recorded against every mutation.
///
/// An opaque string supplied by the caller. Carries attribution only;
/// no authentication or authorization semantics are attached to it.
/// Mutations issued without a caller identity are attributed to the
/// `"system"` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actor(String);

impl Actor {
    /// Creates an actor from a caller-supplied identity string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The fallback actor recorded when no caller identity is supplied.
    pub fn system() -> Self {
        Self("system".to_string())
    }

    /// Returns the identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the `"system"` fallback actor.
    pub fn is_system(&self) -> bool {
        self.0 == "system"
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Actor {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Actor {
    fn from(name: String) -> Self {
        Self(name)
    }
}
