//! Product service providing the catalog-facing API.

use audit_log::{AuditEntry, AuditPayload};
use chrono::Utc;
use common::{Actor, EntityId};
use record_store::Collection;

use crate::error::Result;
use crate::pipeline::MutationPipeline;

use super::{NewProduct, Product, ProductFilter, ProductPatch};

/// Service for managing products.
///
/// Creation, generic updates, and soft deletion run through the shared
/// mutation pipeline; every call appends the matching audit entry
/// attributed to the given actor.
pub struct ProductService<C, L>
where
    C: Collection<Record = Product>,
    L: Collection<Record = AuditEntry>,
{
    pipeline: MutationPipeline<C, L>,
}

impl<C, L> Clone for ProductService<C, L>
where
    C: Collection<Record = Product>,
    L: Collection<Record = AuditEntry>,
{
    fn clone(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
        }
    }
}

impl<C, L> ProductService<C, L>
where
    C: Collection<Record = Product>,
    L: Collection<Record = AuditEntry>,
{
    /// Creates a service over an existing pipeline.
    ///
    /// Every service that mutates the same product collection must
    /// share one pipeline so their writes serialize per product.
    pub fn new(pipeline: MutationPipeline<C, L>) -> Self {
        Self { pipeline }
    }

    /// Returns a reference to the underlying pipeline.
    pub fn pipeline(&self) -> &MutationPipeline<C, L> {
        &self.pipeline
    }

    /// Creates a product and logs its CREATE entry.
    #[tracing::instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: NewProduct, actor: Actor) -> Result<Product> {
        let now = Utc::now();
        let product = Product {
            id: EntityId::new(),
            name: input.name,
            description: input.description,
            category_id: input.category_id,
            subcategory_id: input.subcategory_id,
            current_stock: input.initial_stock.unwrap_or(0),
            total_removed: 0,
            minimum_stock_alert: input.minimum_stock_alert,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            last_restock_at: None,
            last_modified_by: actor.clone(),
        };
        self.pipeline.insert(product, actor).await
    }

    /// Applies a field patch and logs an UPDATE entry with full before
    /// and after snapshots.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, id: EntityId, patch: ProductPatch, actor: Actor) -> Result<Product> {
        self.pipeline
            .update(
                id,
                actor.clone(),
                move |product| {
                    product.apply_patch(patch);
                    product.updated_at = Utc::now();
                    product.last_modified_by = actor;
                    Ok(())
                },
                |before, after| AuditPayload::updated(before, after),
            )
            .await
    }

    /// Soft-deletes a product: the record stays in the collection with
    /// its tombstone set, and a DELETE entry carrying the pre-deletion
    /// snapshot is logged.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: EntityId, actor: Actor) -> Result<Product> {
        self.pipeline
            .update(
                id,
                actor.clone(),
                move |product| {
                    let now = Utc::now();
                    product.deleted_at = Some(now);
                    product.updated_at = now;
                    product.last_modified_by = actor;
                    Ok(())
                },
                |before, _after| AuditPayload::deleted(before),
            )
            .await
    }

    /// Looks up a product by id.
    ///
    /// Soft-deleted products still resolve here; listings are where
    /// tombstones are filtered out.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: EntityId) -> Result<Product> {
        self.pipeline
            .table()
            .find_by_id(id)
            .await?
            .ok_or_else(|| self.pipeline.not_found(id))
    }

    /// Lists non-deleted products matching the filter, in insertion
    /// order.
    #[tracing::instrument(skip(self, filter))]
    pub async fn list(&self, filter: ProductFilter) -> Result<Vec<Product>> {
        let products = self
            .pipeline
            .table()
            .find_where(|p: &Product| {
                !p.is_deleted()
                    && filter.category_id.is_none_or(|id| p.category_id == id)
                    && filter.stock_status.is_none_or(|s| p.stock_status() == s)
            })
            .await?;
        Ok(products)
    }

    /// Non-deleted products belonging to one category.
    pub async fn find_by_category(&self, category_id: EntityId) -> Result<Vec<Product>> {
        self.list(ProductFilter {
            category_id: Some(category_id),
            ..Default::default()
        })
        .await
    }
}
