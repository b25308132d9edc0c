use audit_log::{AuditEntry, AuditPayload};
use chrono::Utc;
use common::{Actor, EntityId};
use record_store::Collection;

use crate::error::Result;
use crate::pipeline::MutationPipeline;

use super::{Category, CategoryPatch, NewCategory};

/// Service for managing the category tree.
///
/// Unlike products, categories are hard-deleted: `delete` removes the
/// record and logs its final snapshot. Children of a deleted category
/// keep their dangling parent reference and become reachable as if
/// they were roots of their own subtrees.
pub struct CategoryService<C, L>
where
    C: Collection<Record = Category>,
    L: Collection<Record = AuditEntry>,
{
    pipeline: MutationPipeline<C, L>,
}

impl<C, L> Clone for CategoryService<C, L>
where
    C: Collection<Record = Category>,
    L: Collection<Record = AuditEntry>,
{
    fn clone(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
        }
    }
}

impl<C, L> CategoryService<C, L>
where
    C: Collection<Record = Category>,
    L: Collection<Record = AuditEntry>,
{
    pub fn new(pipeline: MutationPipeline<C, L>) -> Self {
        Self { pipeline }
    }

    /// Returns a reference to the underlying pipeline.
    pub fn pipeline(&self) -> &MutationPipeline<C, L> {
        &self.pipeline
    }

    /// Creates a category and logs its CREATE entry.
    ///
    /// The parent id is not validated against existing categories;
    /// callers may build the tree in any order.
    #[tracing::instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: NewCategory, actor: Actor) -> Result<Category> {
        let now = Utc::now();
        let category = Category {
            id: EntityId::new(),
            name: input.name,
            parent_id: input.parent_id,
            created_at: now,
            updated_at: now,
        };
        self.pipeline.insert(category, actor).await
    }

    /// Applies a field patch and logs an UPDATE entry.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: EntityId,
        patch: CategoryPatch,
        actor: Actor,
    ) -> Result<Category> {
        self.pipeline
            .update(
                id,
                actor,
                move |category| {
                    category.apply_patch(patch);
                    category.updated_at = Utc::now();
                    Ok(())
                },
                |before, after| AuditPayload::updated(before, after),
            )
            .await
    }

    /// Hard-deletes a category, returning its final state.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: EntityId, actor: Actor) -> Result<Category> {
        self.pipeline.remove(id, actor).await
    }

    /// Looks up a category by id.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: EntityId) -> Result<Category> {
        self.pipeline
            .table()
            .find_by_id(id)
            .await?
            .ok_or_else(|| self.pipeline.not_found(id))
    }

    /// All categories in insertion order.
    pub async fn list(&self) -> Result<Vec<Category>> {
        Ok(self.pipeline.table().find_all().await?)
    }

    /// Direct children of one category.
    pub async fn children(&self, parent_id: EntityId) -> Result<Vec<Category>> {
        Ok(self
            .pipeline
            .table()
            .find_where(|c: &Category| c.parent_id == Some(parent_id))
            .await?)
    }

    /// Resolves a category's parent, tolerating dangling references.
    ///
    /// Returns `Ok(None)` both for roots and for categories whose
    /// parent no longer exists.
    pub async fn parent_of(&self, category: &Category) -> Result<Option<Category>> {
        match category.parent_id {
            Some(parent_id) => Ok(self.pipeline.table().find_by_id(parent_id).await?),
            None => Ok(None),
        }
    }
}
