//! CLI for ferry.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ferry_core::config::{self, FerryConfig};
use ferry_core::session::Session;
use ferry_core::store::{LocalObjectStore, ObjectStore};
use std::path::PathBuf;
use std::sync::Arc;

use commands::{run_download, run_ls, run_mirror, run_upload, Context};

/// Top-level CLI for ferry.
#[derive(Debug, Parser)]
#[command(name = "ferry")]
#[command(about = "ferry: move whole buckets to and from local folders, several files at a time", long_about = None)]
pub struct Cli {
    /// Root of the object store (overrides `store_root` from config).
    #[arg(long, global = true, value_name = "DIR")]
    pub store_root: Option<PathBuf>,

    /// Local download folder (overrides `download_dir` from config).
    #[arg(long, global = true, value_name = "DIR")]
    pub download_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every object in a bucket into `<download-dir>/<bucket>/`.
    Download {
        /// Bucket to download.
        bucket: String,
        /// Number of files transferred at once (default from config, 4).
        #[arg(short, long, value_name = "N", value_parser = parse_concurrency)]
        concurrency: Option<usize>,
        /// Download even if `<download-dir>/<bucket>` already exists.
        #[arg(long)]
        overwrite: bool,
    },

    /// Upload a folder under the download dir into a bucket.
    Upload {
        /// Folder name relative to the download dir.
        src_directory: PathBuf,
        /// Destination bucket.
        dest_bucket: String,
        /// Server-side encryption key id to tag uploaded objects with.
        #[arg(long, value_name = "ID")]
        kms_key_id: Option<String>,
        /// Number of files transferred at once (default from config, 4).
        #[arg(short, long, value_name = "N", value_parser = parse_concurrency)]
        concurrency: Option<usize>,
    },

    /// Download a bucket, then upload the downloaded folder to another bucket.
    Mirror {
        /// Source bucket.
        bucket: String,
        /// Destination bucket.
        dest_bucket: String,
        /// Server-side encryption key id to tag uploaded objects with.
        #[arg(long, value_name = "ID")]
        kms_key_id: Option<String>,
        /// Number of files transferred at once (default from config, 4).
        #[arg(short, long, value_name = "N", value_parser = parse_concurrency)]
        concurrency: Option<usize>,
        /// Download even if `<download-dir>/<bucket>` already exists.
        #[arg(long)]
        overwrite: bool,
    },

    /// List objects in a bucket.
    Ls {
        /// Bucket to list.
        bucket: String,
    },
}

fn parse_concurrency(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("concurrency must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("not a number: {s}")),
    }
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        cli.run(cfg).await
    }

    /// Apply global overrides to `cfg` and dispatch the subcommand.
    pub async fn run(self, mut cfg: FerryConfig) -> Result<()> {
        if let Some(root) = self.store_root {
            cfg.store_root = root;
        }
        if let Some(dir) = self.download_dir {
            cfg.download_dir = dir;
        }
        let store: Arc<dyn ObjectStore> = Arc::new(LocalObjectStore::new(&cfg.store_root));
        let ctx = Context { cfg, store };
        let mut session = Session::new();

        match self.command {
            CliCommand::Download {
                bucket,
                concurrency,
                overwrite,
            } => {
                run_download(&ctx, &mut session, &bucket, concurrency, overwrite).await?;
            }
            CliCommand::Upload {
                src_directory,
                dest_bucket,
                kms_key_id,
                concurrency,
            } => {
                session.upload.src_directory = Some(src_directory);
                run_upload(&ctx, &mut session, &dest_bucket, kms_key_id, concurrency).await?;
            }
            CliCommand::Mirror {
                bucket,
                dest_bucket,
                kms_key_id,
                concurrency,
                overwrite,
            } => {
                run_mirror(
                    &ctx,
                    &mut session,
                    &bucket,
                    &dest_bucket,
                    kms_key_id,
                    concurrency,
                    overwrite,
                )
                .await?;
            }
            CliCommand::Ls { bucket } => {
                run_ls(&ctx, &bucket).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
