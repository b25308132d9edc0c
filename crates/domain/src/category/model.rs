use chrono::{DateTime, Utc};
use common::EntityId;
use record_store::Record;
use serde::{Deserialize, Serialize};

/// A product category. Categories form a hierarchy through
/// `parent_id`; a category without a parent is a root.
///
/// The parent reference is weak: deleting a parent leaves children in
/// place with a dangling `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntityId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Merges a patch into this category. Unset patch fields leave the
    /// current values in place.
    pub fn apply_patch(&mut self, patch: CategoryPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(parent_id) = patch.parent_id {
            self.parent_id = parent_id;
        }
    }
}

impl Record for Category {
    fn record_id(&self) -> EntityId {
        self.id
    }
}

/// Input for creating a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntityId>,
}

/// Partial update for a category.
///
/// The outer `Option` marks whether the field is part of the patch;
/// for `parent_id` the inner `Option` distinguishes re-parenting from
/// detaching to a root.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub parent_id: Option<Option<EntityId>>,
}
