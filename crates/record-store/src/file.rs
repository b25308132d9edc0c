use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{Collection, Record, Result, StoreError};

/// JSON-file collection backend.
///
/// Each collection lives in a single file holding a pretty-printed
/// JSON array of records. Writes go to a temporary file in the same
/// directory and are renamed over the target, so a reader never
/// observes a half-written collection. Clones share the same path.
pub struct JsonFileCollection<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R> JsonFileCollection<R> {
    /// Creates a collection backed by the given file path.
    ///
    /// The file does not need to exist: a missing file reads as an
    /// empty collection and is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl<R> Clone for JsonFileCollection<R> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Record> Collection for JsonFileCollection<R> {
    type Record = R;

    async fn read(&self) -> Result<Vec<R>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    async fn write(&self, records: Vec<R>) -> Result<()> {
        let json = serde_json::to_vec_pretty(&records)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        // Rename within the same directory keeps the replacement atomic.
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            "collection written"
        );
        Ok(())
    }
}
