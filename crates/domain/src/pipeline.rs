//! The audit-logged mutation pipeline.
//!
//! Every write to an entity collection runs through [`MutationPipeline`]:
//! the current record is loaded, the mutation is validated and applied
//! against that fresh state, the collection is written, and only then is
//! the matching audit entry appended. A per-entity lock covers the whole
//! sequence, so two mutations of the same entity never interleave.

use std::collections::HashMap;
use std::sync::Arc;

use audit_log::{AuditEntry, AuditLog, AuditPayload, EntityKind};
use common::{Actor, EntityId};
use record_store::{Collection, Record, RecordTable};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::{DomainError, Result};

/// Registry of per-entity async locks.
///
/// Entries are created on first use and retained for the life of the
/// pipeline; the map is keyed by the entity ids the catalog has seen.
#[derive(Default)]
struct EntityLocks {
    locks: Mutex<HashMap<EntityId, Arc<Mutex<()>>>>,
}

impl EntityLocks {
    async fn lock_for(&self, id: EntityId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(id).or_default())
        };
        lock.lock_owned().await
    }
}

/// Write-then-audit envelope over one entity collection.
///
/// Failure semantics:
/// - a store failure before or at the collection write persists nothing
///   and appends nothing;
/// - an audit append failure after a successful write leaves the write
///   in place and surfaces as [`DomainError::AuditAppend`].
///
/// Nothing is retried. Clones share the table, the trail, and the lock
/// registry, so every service mutating the same collection must hold a
/// clone of the same pipeline.
pub struct MutationPipeline<C, L>
where
    C: Collection,
    L: Collection<Record = AuditEntry>,
{
    table: RecordTable<C>,
    audit: AuditLog<L>,
    kind: EntityKind,
    locks: Arc<EntityLocks>,
}

impl<C, L> Clone for MutationPipeline<C, L>
where
    C: Collection,
    L: Collection<Record = AuditEntry>,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            audit: self.audit.clone(),
            kind: self.kind,
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<C, L> MutationPipeline<C, L>
where
    C: Collection,
    L: Collection<Record = AuditEntry>,
{
    /// Creates a pipeline over one entity table and the shared trail.
    pub fn new(table: RecordTable<C>, audit: AuditLog<L>, kind: EntityKind) -> Self {
        Self {
            table,
            audit,
            kind,
            locks: Arc::new(EntityLocks::default()),
        }
    }

    /// The entity kind stamped on every audit entry this pipeline emits.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Read access to the underlying table.
    ///
    /// Reads are lock-free snapshots; mutations must go through the
    /// pipeline operations.
    pub fn table(&self) -> &RecordTable<C> {
        &self.table
    }

    /// The audit trail this pipeline appends to.
    pub fn audit(&self) -> &AuditLog<L> {
        &self.audit
    }

    /// Persists a new record, then appends its CREATE entry.
    pub async fn insert(&self, record: C::Record, actor: Actor) -> Result<C::Record> {
        let id = record.record_id();
        let _guard = self.locks.lock_for(id).await;

        let payload = AuditPayload::created(&record)?;
        let record = self.table.create(record).await?;
        metrics::counter!("inventory_mutations").increment(1);
        self.log(AuditEntry::new(self.kind, id, payload, actor))
            .await?;
        Ok(record)
    }

    /// Loads the current record, applies `mutate` to a copy, persists
    /// the result, then appends the entry built by `describe` from the
    /// before and after states.
    ///
    /// `mutate` runs against the freshly loaded record while the
    /// entity lock is held, so its validation sees the state that will
    /// actually be replaced. A `mutate` error aborts with nothing
    /// written and nothing appended.
    pub async fn update<M, D>(
        &self,
        id: EntityId,
        actor: Actor,
        mutate: M,
        describe: D,
    ) -> Result<C::Record>
    where
        M: FnOnce(&mut C::Record) -> Result<()>,
        D: FnOnce(&C::Record, &C::Record) -> std::result::Result<AuditPayload, serde_json::Error>,
    {
        let _guard = self.locks.lock_for(id).await;

        let Some(before) = self.table.find_by_id(id).await? else {
            return Err(self.not_found(id));
        };
        let mut after = before.clone();
        mutate(&mut after)?;

        let payload = describe(&before, &after)?;
        let entry = AuditEntry::new(self.kind, id, payload, actor);

        let updated = self
            .table
            .replace(after)
            .await?
            .ok_or_else(|| self.not_found(id))?;
        metrics::counter!("inventory_mutations").increment(1);
        self.log(entry).await?;
        Ok(updated)
    }

    /// Physically removes the record, then appends its DELETE entry
    /// carrying the final snapshot. Returns the removed record.
    pub async fn remove(&self, id: EntityId, actor: Actor) -> Result<C::Record> {
        let _guard = self.locks.lock_for(id).await;

        let Some(before) = self.table.find_by_id(id).await? else {
            return Err(self.not_found(id));
        };
        let payload = AuditPayload::deleted(&before)?;
        if !self.table.delete(id).await? {
            return Err(self.not_found(id));
        }
        metrics::counter!("inventory_mutations").increment(1);
        self.log(AuditEntry::new(self.kind, id, payload, actor))
            .await?;
        Ok(before)
    }

    pub(crate) fn not_found(&self, id: EntityId) -> DomainError {
        DomainError::NotFound {
            kind: self.kind.as_str(),
            id,
        }
    }

    async fn log(&self, entry: AuditEntry) -> Result<()> {
        let action = entry.action();
        match self.audit.append(entry).await {
            Ok(_) => Ok(()),
            Err(e) => {
                metrics::counter!("audit_append_failures").increment(1);
                tracing::error!(error = %e, action = %action, "audit append failed after write");
                Err(DomainError::AuditAppend(e))
            }
        }
    }
}
