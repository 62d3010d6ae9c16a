use std::ffi::OsString;
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Record;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("write task aborted: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// One collection persisted as a pretty-printed JSON array in a single file.
///
/// The store does no locking of its own; `Collection` serializes access.
pub struct JsonFileStore<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> JsonFileStore<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole collection.
    /// A missing or unparsable file is replaced by a single seed record.
    pub async fn load(&self) -> Result<Vec<R>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice::<Vec<R>>(&bytes) {
                Ok(records) => return Ok(records),
                Err(e) => {
                    warn!(
                        "{} is not a valid {} array ({e}); reseeding",
                        self.path.display(),
                        R::NAME
                    );
                    self.set_aside_corrupt().await?;
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("{} not found, creating it with default data", self.path.display());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        }

        let seeded = vec![R::seed(Utc::now())];
        self.save(&seeded).await?;
        Ok(seeded)
    }

    /// Replaces the file contents with `records`.
    /// Writes a sibling temp file and renames it over the target, so readers
    /// never observe a partial file.
    pub async fn save(&self, records: &[R]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(records)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes)).await??;
        debug!("Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Moves an unreadable file to `<file>.corrupt-<millis>` so reseeding
    /// does not destroy what was there.
    async fn set_aside_corrupt(&self) -> Result<(), StoreError> {
        let mut backup: OsString = self.path.clone().into_os_string();
        backup.push(format!(".corrupt-{}", Utc::now().timestamp_millis()));
        let backup = PathBuf::from(backup);

        tokio::fs::rename(&self.path, &backup)
            .await
            .map_err(|source| StoreError::Write {
                path: backup.clone(),
                source,
            })?;
        warn!("Moved unreadable data to {}", backup.display());
        Ok(())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let write_err = |source: std::io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
