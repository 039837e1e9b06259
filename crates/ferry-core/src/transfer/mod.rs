//! Transfer tasks: the unit of work the scheduler admits.
//!
//! A task is started at most once, runs to completion or failure, and can be
//! polled for [`TransferStats`] at any time (before, during and after).

mod batch;
mod download;
mod error;
mod stats;
mod upload;

use async_trait::async_trait;

pub use batch::{download_batch, upload_batch, BatchEntry, BatchError, TaskBatch};
pub use download::FileDownload;
pub use error::TransferError;
pub use stats::{ProgressCounter, TransferStats};
pub use upload::FileUpload;

#[async_trait]
pub trait TransferTask: Send + Sync {
    /// Run the transfer to completion. A second call fails with
    /// [`TransferError::AlreadyStarted`].
    async fn start(&self) -> Result<(), TransferError>;

    /// Current progress. Zero bytes before `start`, final totals after it.
    fn stats(&self) -> TransferStats;
}
