use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Collection, Record, Result};

/// In-memory collection backend for tests and embedding.
///
/// Stores records in insertion order and provides the same interface
/// as the file-backed implementation. Clones share the underlying
/// storage.
pub struct MemoryCollection<R> {
    records: Arc<RwLock<Vec<R>>>,
}

impl<R> MemoryCollection<R> {
    /// Creates a new empty in-memory collection.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Returns the number of records stored.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the collection holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Removes all records.
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

impl<R> Default for MemoryCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for MemoryCollection<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

#[async_trait]
impl<R: Record> Collection for MemoryCollection<R> {
    type Record = R;

    async fn read(&self) -> Result<Vec<R>> {
        Ok(self.records.read().await.clone())
    }

    async fn write(&self, records: Vec<R>) -> Result<()> {
        *self.records.write().await = records;
        Ok(())
    }
}
