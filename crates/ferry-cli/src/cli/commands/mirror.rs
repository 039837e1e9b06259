//! `ferry mirror <bucket> <dest-bucket>` – download, then upload what was
//! downloaded in the same session.

use anyhow::Result;
use ferry_core::scheduler::BatchSummary;
use ferry_core::session::Session;
use std::path::PathBuf;

use super::{run_download, run_upload, Context};

pub async fn run_mirror(
    ctx: &Context,
    session: &mut Session,
    bucket: &str,
    dest_bucket: &str,
    kms_key_id: Option<String>,
    concurrency: Option<usize>,
    overwrite: bool,
) -> Result<(BatchSummary, BatchSummary)> {
    let downloaded = run_download(ctx, session, bucket, concurrency, overwrite).await?;

    let src = session
        .downloaded_bucket()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("session lost the downloaded bucket"))?;
    tracing::info!(src = %src.display(), dest_bucket, "uploading folder downloaded this session");
    session.upload.src_directory = Some(src);

    let uploaded = run_upload(ctx, session, dest_bucket, kms_key_id, concurrency).await?;
    Ok((downloaded, uploaded))
}
