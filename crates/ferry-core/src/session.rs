//! Per-run session state owned by the caller.
//!
//! Remembers what the last workflow step used (download bucket, upload
//! options) so a later step can reuse it; failed steps reset their part. The
//! scheduler and tasks never see this.

use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadOptions {
    pub bucket: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Folder under the download directory to upload.
    pub src_directory: Option<PathBuf>,
    pub dest_bucket: Option<String>,
    pub sse_kms_key_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub download: DownloadOptions,
    pub upload: UploadOptions,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket downloaded earlier in this session, if any.
    pub fn downloaded_bucket(&self) -> Option<&str> {
        self.download.bucket.as_deref()
    }

    pub fn reset_download(&mut self) {
        self.download = DownloadOptions::default();
    }

    pub fn reset_upload(&mut self) {
        self.upload = UploadOptions::default();
    }
}
