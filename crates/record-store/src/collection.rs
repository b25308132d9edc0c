use async_trait::async_trait;

use crate::{Record, Result};

/// Core trait for collection backends.
///
/// A collection holds all records of one type and is accessed only as
/// a whole: `read` returns every record, `write` replaces every record.
/// Callers that need keyed access layer [`crate::RecordTable`] on top.
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Collection: Send + Sync {
    /// The record type stored in this collection.
    type Record: Record;

    /// Reads the entire collection in insertion order.
    ///
    /// A collection that has never been written reads as empty.
    async fn read(&self) -> Result<Vec<Self::Record>>;

    /// Atomically replaces the entire collection.
    ///
    /// After a successful write, `read` observes exactly `records`.
    /// A failed write leaves the previous contents in place.
    async fn write(&self, records: Vec<Self::Record>) -> Result<()>;
}
