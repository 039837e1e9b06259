//! `ferry download <bucket>` – fetch a whole bucket into the download dir.

use anyhow::{Context as _, Result};
use ferry_core::scheduler::BatchSummary;
use ferry_core::session::Session;
use ferry_core::transfer::download_batch;
use std::sync::Arc;

use super::{run_batch, Context};

pub async fn run_download(
    ctx: &Context,
    session: &mut Session,
    bucket: &str,
    concurrency: Option<usize>,
    overwrite: bool,
) -> Result<BatchSummary> {
    let result = download(ctx, session, bucket, concurrency, overwrite).await;
    if result.is_err() {
        session.reset_download();
    }
    result
}

async fn download(
    ctx: &Context,
    session: &mut Session,
    bucket: &str,
    concurrency: Option<usize>,
    overwrite: bool,
) -> Result<BatchSummary> {
    let dest = ctx.cfg.download_dir.join(bucket);
    if dest.exists() && !overwrite {
        anyhow::bail!(
            "download folder already exists: {} (remove it or use --overwrite)",
            dest.display()
        );
    }
    session.download.bucket = Some(bucket.to_string());

    let batch = download_batch(
        Arc::clone(&ctx.store),
        bucket,
        &ctx.cfg.download_dir,
        ctx.cfg.list_page_size,
    )
    .await
    .with_context(|| format!("listing bucket {bucket}"))?;

    let limit = ctx.cfg.concurrency(concurrency);
    let summary = run_batch(ctx, batch, limit, "Download progress:")
        .await
        .with_context(|| format!("downloading bucket {bucket}"))?;
    println!("All files saved to: {}", dest.display());
    Ok(summary)
}
