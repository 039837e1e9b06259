//! `ferry upload <src-directory> <dest-bucket>` – push a local folder.

use anyhow::{Context as _, Result};
use ferry_core::scheduler::BatchSummary;
use ferry_core::session::Session;
use ferry_core::transfer::upload_batch;
use std::sync::Arc;

use super::{run_batch, Context};

/// Uploads `session.upload.src_directory` (relative to the download dir) to
/// `dest_bucket`. Upload options are reset if anything fails.
pub async fn run_upload(
    ctx: &Context,
    session: &mut Session,
    dest_bucket: &str,
    kms_key_id: Option<String>,
    concurrency: Option<usize>,
) -> Result<BatchSummary> {
    let result = upload(ctx, session, dest_bucket, kms_key_id, concurrency).await;
    if result.is_err() {
        session.reset_upload();
    }
    result
}

async fn upload(
    ctx: &Context,
    session: &mut Session,
    dest_bucket: &str,
    kms_key_id: Option<String>,
    concurrency: Option<usize>,
) -> Result<BatchSummary> {
    let src_directory = session
        .upload
        .src_directory
        .clone()
        .ok_or_else(|| anyhow::anyhow!("no source directory given"))?;
    let src_root = ctx.cfg.download_dir.join(&src_directory);
    if !src_root.is_dir() {
        anyhow::bail!("directory does not exist: {}", src_root.display());
    }
    session.upload.dest_bucket = Some(dest_bucket.to_string());
    session.upload.sse_kms_key_id = kms_key_id;

    let batch = upload_batch(
        Arc::clone(&ctx.store),
        dest_bucket,
        &src_root,
        session.upload.sse_kms_key_id.as_deref(),
    )
    .await
    .with_context(|| format!("scanning {}", src_root.display()))?;

    let limit = ctx.cfg.concurrency(concurrency);
    let summary = run_batch(ctx, batch, limit, "Upload progress:")
        .await
        .with_context(|| format!("uploading to bucket {dest_bucket}"))?;
    println!("All files uploaded to bucket: {dest_bucket}");
    Ok(summary)
}
