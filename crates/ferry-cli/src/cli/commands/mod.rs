//! CLI command handlers. Each command is in its own file.

mod download;
mod ls;
mod mirror;
mod upload;

use anyhow::Result;
use ferry_core::config::FerryConfig;
use ferry_core::progress::{render_summary, ProgressReporter, TerminalSink};
use ferry_core::scheduler::{BatchSummary, Scheduler};
use ferry_core::store::ObjectStore;
use ferry_core::transfer::TaskBatch;
use std::sync::Arc;

pub use download::run_download;
pub use ls::run_ls;
pub use mirror::run_mirror;
pub use upload::run_upload;

/// What every command needs: the effective config and the store it points at.
pub struct Context {
    pub cfg: FerryConfig,
    pub store: Arc<dyn ObjectStore>,
}

/// Run `batch` under `limit` with a live progress display, then print a
/// summary line.
pub(crate) async fn run_batch(
    ctx: &Context,
    batch: TaskBatch,
    limit: usize,
    heading: &str,
) -> Result<BatchSummary> {
    let scheduler = Scheduler::new(batch, limit);
    println!("{heading}");
    let reporter = ProgressReporter::spawn(
        scheduler.stats_handle(),
        ctx.cfg.progress_interval(),
        TerminalSink::new(),
    );
    let result = scheduler.start().await;
    reporter.stop().await;

    let summary = result?;
    println!("{}", render_summary(&summary));
    Ok(summary)
}
