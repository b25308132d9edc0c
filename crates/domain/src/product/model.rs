use chrono::{DateTime, Utc};
use common::{Actor, EntityId};
use record_store::Record;
use serde::{Deserialize, Serialize};

use super::StockStatus;

/// A tracked product and its stock position.
///
/// Persisted and exported in camelCase, matching the collection files
/// the catalog has always been stored in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    /// Owning category. A weak reference: existence is not checked
    /// here or on write.
    pub category_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<EntityId>,
    pub current_stock: i64,
    /// Lifetime total of stock removed. Never decreases.
    pub total_removed: i64,
    /// Threshold the stock status is classified against.
    pub minimum_stock_alert: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Tombstone: a value here means the product is soft-deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_restock_at: Option<DateTime<Utc>>,
    pub last_modified_by: Actor,
}

impl Product {
    /// Whether the product has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Classifies the current stock against the alert threshold.
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.current_stock, self.minimum_stock_alert)
    }

    /// Merges a patch into the product. Timestamps and attribution are
    /// the caller's responsibility.
    pub fn apply_patch(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(subcategory_id) = patch.subcategory_id {
            self.subcategory_id = subcategory_id;
        }
        if let Some(current_stock) = patch.current_stock {
            self.current_stock = current_stock;
        }
        if let Some(minimum_stock_alert) = patch.minimum_stock_alert {
            self.minimum_stock_alert = minimum_stock_alert;
        }
    }
}

impl Record for Product {
    fn record_id(&self) -> EntityId {
        self.id
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<EntityId>,
    pub minimum_stock_alert: i64,
    /// Opening stock level. Defaults to zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_stock: Option<i64>,
}

/// Field-wise patch for the generic product update.
///
/// Absent fields keep their current values. `subcategory_id` is doubly
/// optional so a patch can clear the field as well as set it.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<EntityId>,
    pub subcategory_id: Option<Option<EntityId>>,
    /// Direct stock override. Applied as-is: this path does not go
    /// through the stock engine and accepts any value, negatives
    /// included.
    pub current_stock: Option<i64>,
    pub minimum_stock_alert: Option<i64>,
}

/// Filter for product listings. All conditions must hold.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Keep only products in this category.
    pub category_id: Option<EntityId>,
    /// Keep only products whose stock classifies at this level.
    pub stock_status: Option<StockStatus>,
}
