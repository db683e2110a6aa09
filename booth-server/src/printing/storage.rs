//! JSON-file storage for print requests
//!
//! The whole collection lives in one pretty-printed JSON array. Every
//! mutation re-reads the document, changes it and writes the full document
//! back (temp file + rename, so readers never observe a half-written file).
//!
//! All read-modify-write cycles hold `write_lock`; concurrent appends and
//! updates inside one process are serialized and never lose each other's
//! changes. Plain reads do not take the lock.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use shared::models::{PrintRequest, PrintRequestPatch};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt storage document {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Duplicate print request id: {0}")]
    DuplicateId(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Print request storage backed by a single JSON document
#[derive(Debug, Clone)]
pub struct PrintRequestStorage {
    path: Arc<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl PrintRequestStorage {
    /// Storage at `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full collection in insertion order
    ///
    /// A missing document means "no requests yet". Content that does not
    /// parse is [`StorageError::Corrupt`] and is never treated as empty.
    pub async fn read_all(&self) -> StorageResult<Vec<PrintRequest>> {
        let bytes = match tokio::fs::read(self.path.as_path()).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
            path: self.path.to_path_buf(),
            source,
        })
    }

    /// Overwrite the document with `requests`
    pub async fn write_all(&self, requests: &[PrintRequest]) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        self.write_locked(requests).await
    }

    /// Append one request
    ///
    /// Fails with [`StorageError::DuplicateId`] if the id is already stored.
    #[instrument(skip(self, request), fields(id = %request.id))]
    pub async fn append(&self, request: PrintRequest) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut requests = self.read_all().await?;
        if requests.iter().any(|r| r.id == request.id) {
            return Err(StorageError::DuplicateId(request.id));
        }
        requests.push(request);
        self.write_locked(&requests).await
    }

    /// Find one request by id (linear scan)
    pub async fn find_by_id(&self, id: &str) -> StorageResult<Option<PrintRequest>> {
        let requests = self.read_all().await?;
        Ok(requests.into_iter().find(|r| r.id == id))
    }

    /// Merge `patch` into the request with `id`
    ///
    /// Returns the merged record, or `None` (and writes nothing) when no
    /// request matches.
    #[instrument(skip(self, patch))]
    pub async fn update_by_id(
        &self,
        id: &str,
        patch: &PrintRequestPatch,
    ) -> StorageResult<Option<PrintRequest>> {
        self.transition(id, |_| Ok::<_, StorageError>(patch.clone()))
            .await
    }

    /// Checked read-modify-write of one request
    ///
    /// `decide` sees the current record and returns the patch to apply, or
    /// an error that aborts the update without writing. The check and the
    /// write happen under the same lock.
    pub async fn transition<F, E>(&self, id: &str, decide: F) -> Result<Option<PrintRequest>, E>
    where
        F: FnOnce(&PrintRequest) -> Result<PrintRequestPatch, E>,
        E: From<StorageError>,
    {
        let _guard = self.write_lock.lock().await;

        let mut requests = self.read_all().await?;
        let Some(index) = requests.iter().position(|r| r.id == id) else {
            debug!(id, "Print request not found, nothing written");
            return Ok(None);
        };

        let patch = decide(&requests[index])?;
        requests[index].apply(&patch);
        let updated = requests[index].clone();

        self.write_locked(&requests).await?;
        Ok(Some(updated))
    }

    /// Write the document; caller must hold `write_lock`
    async fn write_locked(&self, requests: &[PrintRequest]) -> StorageResult<()> {
        let path = self.path.as_path();
        let write_err = |source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        };

        let json = serde_json::to_vec_pretty(requests)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        // Atomic write: tmp file + rename
        let tmp_path = tmp_path_for(path);
        tokio::fs::write(&tmp_path, &json).await.map_err(write_err)?;
        if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(write_err(e));
        }

        debug!(count = requests.len(), bytes = json.len(), "Print requests written");
        Ok(())
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "print_requests.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}
