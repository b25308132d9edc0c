use common::EntityId;
use serde::{Serialize, de::DeserializeOwned};

/// A persistable record with a stable identity.
///
/// Implemented by every type stored in a collection. The id acts as
/// the record's primary key within its collection and must not change
/// over the record's lifetime.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Returns the record's unique id.
    fn record_id(&self) -> EntityId;
}
