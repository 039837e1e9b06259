//! Temp files that are renamed into place once complete.
//!
//! A staging area is a hidden `.ferry-tmp` directory placed next to bucket
//! directories (in the store root, or in the download dir). Bucket names never
//! start with a dot, so a staged file can neither shadow nor clobber a real
//! object or a downloaded file, whatever its key.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Name of the staging directory created under a store root or download dir.
pub const STAGING_DIR: &str = ".ferry-tmp";

const TEMP_SUFFIX: &str = ".part";

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Reserved temp path under `<parent>/.ferry-tmp/`. The file at that path is
/// removed on drop unless [`StagedPath::commit`] renamed it into place.
#[derive(Debug)]
pub(crate) struct StagedPath {
    path: PathBuf,
    committed: bool,
}

impl StagedPath {
    /// Create the staging directory under `parent` and reserve a unique name
    /// in it. Nothing is written until the caller creates the file.
    pub(crate) async fn reserve(parent: &Path) -> io::Result<Self> {
        let dir = parent.join(STAGING_DIR);
        tokio::fs::create_dir_all(&dir).await?;
        let name = format!(
            "{}-{}{}",
            std::process::id(),
            NEXT_ID.fetch_add(1, Ordering::Relaxed),
            TEMP_SUFFIX
        );
        Ok(Self {
            path: dir.join(name),
            committed: false,
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Rename the staged file to `dest`, creating `dest`'s parent directories.
    /// Close the file before calling this.
    pub(crate) async fn commit(mut self, dest: &Path) -> io::Result<()> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::rename(&self.path, dest).await?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedPath {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed staged file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "staged file left behind"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn commit_moves_file_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedPath::reserve(dir.path()).await.unwrap();
        assert!(staged.path().starts_with(dir.path().join(STAGING_DIR)));
        tokio::fs::write(staged.path(), b"done").await.unwrap();
        let temp = staged.path().to_path_buf();

        let dest = dir.path().join("bucket/nested/file.bin");
        staged.commit(&dest).await.unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"done");
        assert!(!temp.exists());
    }

    #[tokio::test]
    async fn dropped_reservation_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedPath::reserve(dir.path()).await.unwrap();
        tokio::fs::write(staged.path(), b"half").await.unwrap();
        let temp = staged.path().to_path_buf();
        drop(staged);
        assert!(!temp.exists());
    }

    #[tokio::test]
    async fn reservations_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let a = StagedPath::reserve(dir.path()).await.unwrap();
        let b = StagedPath::reserve(dir.path()).await.unwrap();
        assert_ne!(a.path(), b.path());
    }
}
