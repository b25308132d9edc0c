//! Stock engine: validated restock and removal operations.

use audit_log::{AuditEntry, AuditPayload};
use chrono::Utc;
use common::{Actor, EntityId};
use record_store::Collection;

use crate::error::{DomainError, Result};
use crate::pipeline::MutationPipeline;

use super::Product;

/// Service for stock movements.
///
/// Unlike the generic update path, both operations here validate the
/// quantity and, for removals, the available stock before any write
/// happens. Audit entries for stock movements carry bare levels rather
/// than full snapshots.
pub struct StockService<C, L>
where
    C: Collection<Record = Product>,
    L: Collection<Record = AuditEntry>,
{
    pipeline: MutationPipeline<C, L>,
}

impl<C, L> Clone for StockService<C, L>
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

impl<C, L> StockService<C, L>
where
    C: Collection<Record = Product>,
    L: Collection<Record = AuditEntry>,
{
    /// Creates a service over an existing pipeline.
    ///
    /// Must share the pipeline with the product service so stock
    /// movements and catalog updates of one product serialize.
    pub fn new(pipeline: MutationPipeline<C, L>) -> Self {
        Self { pipeline }
    }

    /// Adds stock to a product and logs a RESTOCK entry.
    #[tracing::instrument(skip(self))]
    pub async fn restock(&self, id: EntityId, quantity: i64, actor: Actor) -> Result<Product> {
        if quantity <= 0 {
            return Err(DomainError::InvalidQuantity { quantity });
        }
        self.pipeline
            .update(
                id,
                actor.clone(),
                move |product| {
                    product.current_stock += quantity;
                    let now = Utc::now();
                    product.last_restock_at = Some(now);
                    product.updated_at = now;
                    product.last_modified_by = actor;
                    Ok(())
                },
                |before, after| {
                    Ok(AuditPayload::restocked(
                        before.current_stock,
                        after.current_stock,
                    ))
                },
            )
            .await
    }

    /// Removes stock from a product and logs a REMOVE_STOCK entry.
    ///
    /// Fails with [`DomainError::InsufficientStock`] when fewer units
    /// are available than requested; the product is left untouched and
    /// nothing is logged.
    #[tracing::instrument(skip(self))]
    pub async fn remove_stock(&self, id: EntityId, quantity: i64, actor: Actor) -> Result<Product> {
        if quantity <= 0 {
            return Err(DomainError::InvalidQuantity { quantity });
        }
        self.pipeline
            .update(
                id,
                actor.clone(),
                move |product| {
                    if product.current_stock < quantity {
                        return Err(DomainError::InsufficientStock {
                            available: product.current_stock,
                            requested: quantity,
                        });
                    }
                    product.current_stock -= quantity;
                    product.total_removed += quantity;
                    product.updated_at = Utc::now();
                    product.last_modified_by = actor;
                    Ok(())
                },
                |before, after| {
                    Ok(AuditPayload::stock_removed(
                        before.current_stock,
                        after.current_stock,
                    ))
                },
            )
            .await
    }
}
