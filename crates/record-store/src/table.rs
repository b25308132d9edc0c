use std::sync::Arc;

use common::EntityId;
use tokio::sync::Mutex;

use crate::record::Record;
use crate::{Collection, Result};

/// Keyed repository over a single collection.
///
/// Every mutating operation runs a full read-modify-write cycle
/// against the backend. An internal lock serializes those cycles, so
/// two writers on the same table never interleave between reading the
/// collection and writing it back. Read operations take no lock and
/// observe the last completed write.
///
/// Clones share the backend and the write lock.
pub struct RecordTable<C: Collection> {
    inner: Arc<Inner<C>>,
}

struct Inner<C> {
    collection: C,
    write_lock: Mutex<()>,
}

impl<C: Collection> Clone for RecordTable<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Collection> RecordTable<C> {
    /// Creates a table over the given collection backend.
    pub fn new(collection: C) -> Self {
        Self {
            inner: Arc::new(Inner {
                collection,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Returns a reference to the underlying collection.
    pub fn collection(&self) -> &C {
        &self.inner.collection
    }

    /// Appends a record to the collection, returning it unchanged.
    pub async fn create(&self, record: C::Record) -> Result<C::Record> {
        let _guard = self.inner.write_lock.lock().await;
        let mut records = self.inner.collection.read().await?;
        records.push(record.clone());
        self.inner.collection.write(records).await?;
        Ok(record)
    }

    /// Applies `patch` to the record with the given id and persists the
    /// result.
    ///
    /// Returns the updated record, or `None` if no record matches, in
    /// which case nothing is written.
    pub async fn update_with<F>(&self, id: EntityId, patch: F) -> Result<Option<C::Record>>
    where
        F: FnOnce(&mut C::Record),
    {
        let _guard = self.inner.write_lock.lock().await;
        let mut records = self.inner.collection.read().await?;
        let Some(record) = records.iter_mut().find(|r| r.record_id() == id) else {
            return Ok(None);
        };
        patch(record);
        let updated = record.clone();
        self.inner.collection.write(records).await?;
        Ok(Some(updated))
    }

    /// Swaps in a new value for the stored record with the same id.
    ///
    /// Returns the new value, or `None` if no record matches, in which
    /// case nothing is written.
    pub async fn replace(&self, record: C::Record) -> Result<Option<C::Record>> {
        let _guard = self.inner.write_lock.lock().await;
        let mut records = self.inner.collection.read().await?;
        let id = record.record_id();
        let Some(slot) = records.iter_mut().find(|r| r.record_id() == id) else {
            return Ok(None);
        };
        *slot = record.clone();
        self.inner.collection.write(records).await?;
        Ok(Some(record))
    }

    /// Physically removes the record with the given id.
    ///
    /// Returns whether a record was removed.
    pub async fn delete(&self, id: EntityId) -> Result<bool> {
        let _guard = self.inner.write_lock.lock().await;
        let mut records = self.inner.collection.read().await?;
        let before = records.len();
        records.retain(|r| r.record_id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.inner.collection.write(records).await?;
        Ok(true)
    }

    /// Looks up a record by id.
    pub async fn find_by_id(&self, id: EntityId) -> Result<Option<C::Record>> {
        let records = self.inner.collection.read().await?;
        Ok(records.into_iter().find(|r| r.record_id() == id))
    }

    /// Returns all records in insertion order.
    pub async fn find_all(&self) -> Result<Vec<C::Record>> {
        self.inner.collection.read().await
    }

    /// Returns the records matching a predicate, in insertion order.
    pub async fn find_where<P>(&self, predicate: P) -> Result<Vec<C::Record>>
    where
        P: FnMut(&C::Record) -> bool,
    {
        let mut records = self.inner.collection.read().await?;
        records.retain(predicate);
        Ok(records)
    }

    /// Returns the total number of records.
    pub async fn count(&self) -> Result<usize> {
        Ok(self.inner.collection.read().await?.len())
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use crate::MemoryCollection;
    use crate::record::Record;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: EntityId,
        body: String,
    }

    impl Record for Note {
        fn record_id(&self) -> EntityId {
            self.id
        }
    }

    fn note(body: &str) -> Note {
        Note {
            id: EntityId::new(),
            body: body.to_string(),
        }
    }

    fn table() -> RecordTable<MemoryCollection<Note>> {
        RecordTable::new(MemoryCollection::new())
    }

    #[tokio::test]
    async fn create_appends_and_returns_record() {
        let table = table();
        let record = note("hello");

        let created = table.create(record.clone()).await.unwrap();
        assert_eq!(created, record);
        assert_eq!(table.count().await.unwrap(), 1);
        assert_eq!(table.find_by_id(record.id).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn find_by_id_misses_unknown_record() {
        let table = table();
        table.create(note("present")).await.unwrap();

        assert_eq!(table.find_by_id(EntityId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_with_patches_matching_record() {
        let table = table();
        let record = table.create(note("before")).await.unwrap();
        table.create(note("untouched")).await.unwrap();

        let updated = table
            .update_with(record.id, |r| r.body = "after".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.body, "after");

        let stored = table.find_by_id(record.id).await.unwrap().unwrap();
        assert_eq!(stored.body, "after");
        assert_eq!(table.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn update_with_unknown_id_writes_nothing() {
        let table = table();
        table.create(note("only")).await.unwrap();

        let result = table
            .update_with(EntityId::new(), |r| r.body.clear())
            .await
            .unwrap();
        assert!(result.is_none());

        let all = table.find_all().await.unwrap();
        assert_eq!(all[0].body, "only");
    }

    #[tokio::test]
    async fn replace_swaps_record_by_id() {
        let table = table();
        let record = table.create(note("original")).await.unwrap();

        let mut replacement = record.clone();
        replacement.body = "replaced".to_string();
        let swapped = table.replace(replacement.clone()).await.unwrap();
        assert_eq!(swapped, Some(replacement.clone()));
        assert_eq!(table.find_by_id(record.id).await.unwrap(), Some(replacement));
    }

    #[tokio::test]
    async fn replace_unknown_record_returns_none() {
        let table = table();
        assert_eq!(table.replace(note("ghost")).await.unwrap(), None);
        assert_eq!(table.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_removes_only_matching_record() {
        let table = table();
        let doomed = table.create(note("doomed")).await.unwrap();
        let kept = table.create(note("kept")).await.unwrap();

        assert!(table.delete(doomed.id).await.unwrap());
        assert!(!table.delete(doomed.id).await.unwrap());

        let all = table.find_all().await.unwrap();
        assert_eq!(all, vec![kept]);
    }

    #[tokio::test]
    async fn find_where_filters_in_order() {
        let table = table();
        table.create(note("keep one")).await.unwrap();
        table.create(note("drop")).await.unwrap();
        table.create(note("keep two")).await.unwrap();

        let kept = table
            .find_where(|r| r.body.starts_with("keep"))
            .await
            .unwrap();
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].body, "keep one");
        assert_eq!(kept[1].body, "keep two");
    }

    #[tokio::test]
    async fn concurrent_creates_all_land() {
        let table = table();

        let mut handles = Vec::new();
        for i in 0..16 {
            let table = table.clone();
            handles.push(tokio::spawn(async move {
                table.create(note(&format!("note-{i}"))).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(table.count().await.unwrap(), 16);
    }
}
