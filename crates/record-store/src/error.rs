use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading or writing a collection.
///
/// An empty collection is never an error: backends report a collection
/// that has never been written as an empty list. Failures to read or
/// parse an existing collection surface here instead of being
/// conflated with emptiness.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred on a collection file.
    #[error("I/O error on collection {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A collection file exists but does not parse as records.
    #[error("corrupt collection {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be serialized for storage.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
