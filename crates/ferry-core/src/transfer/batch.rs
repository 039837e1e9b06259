//! Ordered task batches and the builders that produce them from a bucket
//! listing or a local directory tree.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use super::{FileDownload, FileUpload, TransferError, TransferTask};
use crate::store::{ObjectStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("transfer identifier must not be empty")]
    EmptyId,

    #[error("duplicate transfer identifier: {0}")]
    DuplicateId(String),

    #[error("source directory not found: {0}")]
    MissingSource(PathBuf),

    #[error("walking {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("listing bucket: {0}")]
    Store(#[from] StoreError),

    #[error("directory scan task: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("building transfer for {id}: {source}")]
    Task {
        id: String,
        #[source]
        source: TransferError,
    },
}

/// One `(identifier, task)` pair. The task is shared with the scheduler while
/// it runs.
#[derive(Clone)]
pub struct BatchEntry {
    pub id: String,
    pub task: Arc<dyn TransferTask>,
}

impl std::fmt::Debug for BatchEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchEntry")
            .field("id", &self.id)
            .field("stats", &self.task.stats())
            .finish()
    }
}

/// Transfers submitted together. Insertion order is admission order;
/// identifiers are non-empty and unique.
#[derive(Debug, Default)]
pub struct TaskBatch {
    entries: Vec<BatchEntry>,
    ids: HashSet<String>,
}

impl TaskBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        id: impl Into<String>,
        task: Arc<dyn TransferTask>,
    ) -> Result<(), BatchError> {
        let id = id.into();
        if id.is_empty() {
            return Err(BatchError::EmptyId);
        }
        if !self.ids.insert(id.clone()) {
            return Err(BatchError::DuplicateId(id));
        }
        self.entries.push(BatchEntry { id, task });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    /// Sum of every task's `total_size`.
    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(|e| e.task.stats().total_size).sum()
    }

    pub fn into_entries(self) -> Vec<BatchEntry> {
        self.entries
    }
}

/// One download per object in `bucket`, in listing order, keyed by object key.
/// Folder markers (keys ending in `/`) are skipped.
pub async fn download_batch(
    store: Arc<dyn ObjectStore>,
    bucket: &str,
    download_dir: &Path,
    page_size: usize,
) -> Result<TaskBatch, BatchError> {
    let objects = store.list_all(bucket, page_size).await?;
    let mut batch = TaskBatch::new();
    for object in objects {
        if object.key.ends_with('/') {
            tracing::debug!(key = %object.key, "skipping folder marker");
            continue;
        }
        let id = object.key.clone();
        let task = FileDownload::new(Arc::clone(&store), bucket, object, download_dir)
            .map_err(|source| BatchError::Task {
                id: id.clone(),
                source,
            })?;
        batch.push(id, Arc::new(task))?;
    }
    tracing::info!(bucket, transfers = batch.len(), "built download batch");
    Ok(batch)
}

/// One upload per regular file under `src_root`, in sorted path order.
///
/// The identifier is the source path; the destination key is the path
/// relative to `src_root` with `/` separators. The walk and the per-file size
/// lookups run on the blocking pool.
pub async fn upload_batch(
    store: Arc<dyn ObjectStore>,
    dest_bucket: &str,
    src_root: &Path,
    sse_kms_key_id: Option<&str>,
) -> Result<TaskBatch, BatchError> {
    let dest_bucket = dest_bucket.to_string();
    let src_root = src_root.to_path_buf();
    let sse_kms_key_id = sse_kms_key_id.map(str::to_string);
    tokio::task::spawn_blocking(move || {
        scan_upload_tree(store, &dest_bucket, &src_root, sse_kms_key_id)
    })
    .await?
}

fn scan_upload_tree(
    store: Arc<dyn ObjectStore>,
    dest_bucket: &str,
    src_root: &Path,
    sse_kms_key_id: Option<String>,
) -> Result<TaskBatch, BatchError> {
    if !src_root.is_dir() {
        return Err(BatchError::MissingSource(src_root.to_path_buf()));
    }
    let mut batch = TaskBatch::new();
    for entry in WalkDir::new(src_root).sort_by_file_name() {
        let entry = entry.map_err(|source| BatchError::Walk {
            path: src_root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(dest_key) = relative_key(src_root, entry.path()) else {
            tracing::warn!(path = %entry.path().display(), "skipping non-UTF-8 path");
            continue;
        };
        let id = entry.path().to_string_lossy().into_owned();
        let task = FileUpload::new(
            Arc::clone(&store),
            dest_bucket,
            entry.path(),
            &dest_key,
            sse_kms_key_id.clone(),
        )
        .map_err(|source| BatchError::Task {
            id: id.clone(),
            source,
        })?;
        batch.push(id, Arc::new(task))?;
    }
    tracing::info!(
        src = %src_root.display(),
        dest_bucket,
        transfers = batch.len(),
        "built upload batch"
    );
    Ok(batch)
}

/// `path` relative to `root`, joined with `/`.
fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = rel.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}
