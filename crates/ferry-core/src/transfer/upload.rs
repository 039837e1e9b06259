//! Local file → object.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

use super::{ProgressCounter, TransferError, TransferStats, TransferTask};
use crate::store::{validate_key, ObjectStore, PutRequest};

/// Reader that advances a [`ProgressCounter`] by every byte the consumer pulls.
struct CountingReader<R> {
    inner: R,
    progress: ProgressCounter,
}

impl<R: AsyncRead + Unpin> AsyncRead for CountingReader<R> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let before = buf.filled().len();
        let this = &mut *self;
        let poll = Pin::new(&mut this.inner).poll_read(cx, buf);
        if let Poll::Ready(Ok(())) = poll {
            this.progress.add((buf.filled().len() - before) as u64);
        }
        poll
    }
}

/// Uploads one local file to `dest_bucket/dest_key`.
///
/// The file size is captured at construction and is the task's `total_size`.
pub struct FileUpload {
    store: Arc<dyn ObjectStore>,
    request: PutRequest,
    src_path: PathBuf,
    total_size: u64,
    started: AtomicBool,
    progress: ProgressCounter,
}

impl FileUpload {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        dest_bucket: &str,
        src_path: &Path,
        dest_key: &str,
        sse_kms_key_id: Option<String>,
    ) -> Result<Self, TransferError> {
        validate_key(dest_key)?;
        let total_size = std::fs::metadata(src_path)?.len();
        Ok(Self {
            store,
            request: PutRequest {
                bucket: dest_bucket.to_string(),
                key: dest_key.to_string(),
                sse_kms_key_id,
            },
            src_path: src_path.to_path_buf(),
            total_size,
            started: AtomicBool::new(false),
            progress: ProgressCounter::new(),
        })
    }

    pub fn dest_key(&self) -> &str {
        &self.request.key
    }
}

#[async_trait]
impl TransferTask for FileUpload {
    async fn start(&self) -> Result<(), TransferError> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(TransferError::AlreadyStarted);
        }
        let file = tokio::fs::File::open(&self.src_path).await?;
        let mut reader = CountingReader {
            inner: file,
            progress: self.progress.clone(),
        };
        self.store
            .put_object(&self.request, &mut reader, self.total_size)
            .await?;

        tracing::debug!(
            src = %self.src_path.display(),
            bucket = %self.request.bucket,
            key = %self.request.key,
            "upload finished"
        );
        Ok(())
    }

    fn stats(&self) -> TransferStats {
        TransferStats::new(self.progress.get(), self.total_size)
    }
}
