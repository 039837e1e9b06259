//! `ferry ls <bucket>` – list objects and sizes.

use anyhow::{Context as _, Result};
use ferry_core::store::ObjectInfo;

use super::Context;

/// Prints the listing and returns it.
pub async fn run_ls(ctx: &Context, bucket: &str) -> Result<Vec<ObjectInfo>> {
    let objects = ctx
        .store
        .list_all(bucket, ctx.cfg.list_page_size)
        .await
        .with_context(|| format!("listing bucket {bucket}"))?;
    if objects.is_empty() {
        println!("Bucket {bucket} is empty.");
        return Ok(objects);
    }
    println!("{:>12}  {}", "SIZE", "KEY");
    let mut total = 0u64;
    for object in &objects {
        total += object.size;
        println!("{:>12}  {}", object.size, object.key);
    }
    println!("{} object(s), {} bytes", objects.len(), total);
    Ok(objects)
}
