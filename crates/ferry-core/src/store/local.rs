//! Filesystem-backed object store: one directory per bucket under a root.
//!
//! Keys are paths relative to the bucket directory with `/` separators. Every
//! regular file in a bucket directory is an object. PUTs are written into the
//! root's staging directory and renamed into the bucket once the whole body
//! has landed, so listings never report half-written objects.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use walkdir::WalkDir;

use super::{
    validate_bucket, validate_key, ListPage, ObjectBody, ObjectInfo, ObjectStore, PutRequest,
    StoreError,
};
use crate::staging::StagedPath;

#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory backing `bucket`; errors if the bucket does not exist.
    fn bucket_dir(&self, bucket: &str) -> Result<PathBuf, StoreError> {
        validate_bucket(bucket)?;
        let dir = self.root.join(bucket);
        if !dir.is_dir() {
            return Err(StoreError::NoSuchBucket(bucket.to_string()));
        }
        Ok(dir)
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.bucket_dir(bucket)?.join(key))
    }
}

/// All committed keys under `dir`, sorted.
fn collect_objects(dir: &Path) -> Result<Vec<ObjectInfo>, StoreError> {
    let mut objects = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(|e| {
            e.into_io_error()
                .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "directory walk loop"))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = match entry.path().strip_prefix(dir) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let parts: Option<Vec<&str>> = rel.components().map(|c| c.as_os_str().to_str()).collect();
        let Some(parts) = parts else {
            tracing::warn!(path = %entry.path().display(), "skipping non-UTF-8 object path");
            continue;
        };
        let key = parts.join("/");
        let size = entry.metadata().map_err(io::Error::from)?.len();
        objects.push(ObjectInfo { key, size });
    }
    objects.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(objects)
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn list_page(
        &self,
        bucket: &str,
        continuation: Option<&str>,
        max_keys: usize,
    ) -> Result<ListPage, StoreError> {
        let dir = self.bucket_dir(bucket)?;
        let all = tokio::task::spawn_blocking(move || collect_objects(&dir))
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("listing task join: {e}")))??;

        let max_keys = max_keys.max(1);
        let mut remaining = all
            .into_iter()
            .filter(|o| continuation.map_or(true, |after| o.key.as_str() > after))
            .peekable();
        let objects: Vec<ObjectInfo> = remaining.by_ref().take(max_keys).collect();
        let next_continuation = match (remaining.peek(), objects.last()) {
            (Some(_), Some(last)) => Some(last.key.clone()),
            _ => None,
        };
        Ok(ListPage {
            objects,
            next_continuation,
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectBody, StoreError> {
        let path = self.object_path(bucket, key)?;
        let no_such_key = || StoreError::NoSuchKey {
            bucket: bucket.to_string(),
            key: key.to_string(),
        };
        if path.is_dir() {
            return Err(no_such_key());
        }
        match tokio::fs::File::open(&path).await {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(no_such_key()),
            Err(e) => Err(e.into()),
        }
    }

    async fn put_object(
        &self,
        request: &PutRequest,
        body: &mut (dyn AsyncRead + Send + Unpin),
        len: u64,
    ) -> Result<(), StoreError> {
        let final_path = self.object_path(&request.bucket, &request.key)?;
        if let Some(kms) = request.sse_kms_key_id.as_deref() {
            tracing::debug!(key = %request.key, kms_key_id = kms, "local store does not encrypt; key id ignored");
        }

        let staged = StagedPath::reserve(&self.root).await?;
        let mut file = tokio::fs::File::create(staged.path()).await?;
        let mut limited = (&mut *body).take(len);
        let written = tokio::io::copy(&mut limited, &mut file).await?;
        if written != len {
            return Err(StoreError::ShortBody {
                key: request.key.clone(),
                expected: len,
                received: written,
            });
        }
        file.flush().await?;
        file.sync_all().await?;
        drop(file);
        staged.commit(&final_path).await?;
        Ok(())
    }
}
