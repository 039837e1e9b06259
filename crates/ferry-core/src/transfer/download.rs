//! Object → local file.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::{ProgressCounter, TransferError, TransferStats, TransferTask};
use crate::staging::StagedPath;
use crate::store::{validate_bucket, validate_key, ObjectInfo, ObjectStore};

/// Read buffer size for streaming an object body to disk.
const COPY_CHUNK: usize = 64 * 1024;

/// Streams one object into `download_dir/<bucket>/<key>`.
///
/// The body lands in the download dir's staging area first and is renamed to
/// `dest_path` only once fully received, so a failed transfer leaves nothing
/// at the destination. `total_size` is the size reported by the listing; the
/// counter advances by every chunk received, so a stale listing size shows up
/// as >100%.
pub struct FileDownload {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    object: ObjectInfo,
    download_dir: PathBuf,
    dest_path: PathBuf,
    started: AtomicBool,
    progress: ProgressCounter,
}

impl FileDownload {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        bucket: &str,
        object: ObjectInfo,
        download_dir: &Path,
    ) -> Result<Self, TransferError> {
        validate_bucket(bucket)?;
        validate_key(&object.key)?;
        let dest_path = download_dir.join(bucket).join(&object.key);
        Ok(Self {
            store,
            bucket: bucket.to_string(),
            object,
            download_dir: download_dir.to_path_buf(),
            dest_path,
            started: AtomicBool::new(false),
            progress: ProgressCounter::new(),
        })
    }

    pub fn dest_path(&self) -> &Path {
        &self.dest_path
    }
}

#[async_trait]
impl TransferTask for FileDownload {
    async fn start(&self) -> Result<(), TransferError> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(TransferError::AlreadyStarted);
        }
        let mut body = self.store.get_object(&self.bucket, &self.object.key).await?;
        let staged = StagedPath::reserve(&self.download_dir).await?;
        let mut file = tokio::fs::File::create(staged.path()).await?;
        let mut buf = vec![0u8; COPY_CHUNK];
        loop {
            let n = body.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n]).await?;
            self.progress.add(n as u64);
        }
        file.flush().await?;
        file.sync_all().await?;
        drop(file);
        staged.commit(&self.dest_path).await?;

        tracing::debug!(
            bucket = %self.bucket,
            key = %self.object.key,
            bytes = self.progress.get(),
            "download finished"
        );
        Ok(())
    }

    fn stats(&self) -> TransferStats {
        TransferStats::new(self.progress.get(), self.object.size)
    }
}
