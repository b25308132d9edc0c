use std::pin::Pin;

use common::EntityId;
use futures_core::Stream;
use record_store::{Collection, RecordTable, Result};

use crate::{AuditEntry, EntityKind};

/// A stream of audit entries, oldest first.
pub type AuditStream = Pin<Box<dyn Stream<Item = Result<AuditEntry>> + Send>>;

/// Append-only audit trail over a record collection.
///
/// The log exposes append and read operations only; existing entries
/// are never modified or removed through this type. Clones share the
/// backing table, so every service appending to the same trail sees
/// one consistent history.
pub struct AuditLog<C: Collection<Record = AuditEntry>> {
    table: RecordTable<C>,
}

impl<C: Collection<Record = AuditEntry>> Clone for AuditLog<C> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<C: Collection<Record = AuditEntry>> AuditLog<C> {
    /// Maximum number of entries returned by [`find_all`].
    ///
    /// A display policy, not a retention bound: [`count`] and
    /// [`stream_all`] always see the full trail.
    ///
    /// [`find_all`]: Self::find_all
    /// [`count`]: Self::count
    /// [`stream_all`]: Self::stream_all
    pub const HISTORY_CAP: usize = 1000;

    /// Creates a log over the given collection backend.
    pub fn new(collection: C) -> Self {
        Self {
            table: RecordTable::new(collection),
        }
    }

    /// Appends an entry to the trail.
    #[tracing::instrument(
        skip(self, entry),
        fields(action = %entry.action(), entity_id = %entry.entity_id)
    )]
    pub async fn append(&self, entry: AuditEntry) -> Result<AuditEntry> {
        let entry = self.table.create(entry).await?;
        metrics::counter!("audit_entries_appended").increment(1);
        Ok(entry)
    }

    /// Returns the most recent entries, newest first, capped at
    /// [`Self::HISTORY_CAP`].
    pub async fn find_all(&self) -> Result<Vec<AuditEntry>> {
        self.find_recent(Self::HISTORY_CAP).await
    }

    /// Returns up to `limit` entries, newest first.
    pub async fn find_recent(&self, limit: usize) -> Result<Vec<AuditEntry>> {
        let mut entries = self.table.find_all().await?;
        Self::newest_first(&mut entries);
        entries.truncate(limit);
        Ok(entries)
    }

    /// Returns every entry for one entity, newest first. Unbounded.
    pub async fn find_by_entity(
        &self,
        entity_type: EntityKind,
        entity_id: EntityId,
    ) -> Result<Vec<AuditEntry>> {
        let mut entries = self
            .table
            .find_where(|e| e.entity_type == entity_type && e.entity_id == entity_id)
            .await?;
        Self::newest_first(&mut entries);
        Ok(entries)
    }

    /// Total number of entries in the trail, ignoring the display cap.
    pub async fn count(&self) -> Result<usize> {
        self.table.count().await
    }

    /// Streams the full trail, oldest first.
    pub async fn stream_all(&self) -> Result<AuditStream> {
        let entries = self.table.find_all().await?;
        let stream = futures_util::stream::iter(entries.into_iter().map(Ok));
        Ok(Box::pin(stream))
    }

    // Entries land in append order; the stable sort on the reversed
    // list keeps later appends first among equal timestamps.
    fn newest_first(entries: &mut [AuditEntry]) {
        entries.reverse();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    }
}
