use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::scheduler::DEFAULT_CONCURRENCY;
use crate::store::DEFAULT_PAGE_SIZE;

/// Global configuration loaded from `~/.config/ferry/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FerryConfig {
    /// Local folder downloads land in (one sub-folder per bucket) and uploads
    /// are read from.
    pub download_dir: PathBuf,
    /// Root directory of the local object store; each bucket is a sub-folder.
    pub store_root: PathBuf,
    /// Transfers run at once when `--concurrency` is not given.
    pub default_concurrency: usize,
    /// Progress redraw interval in milliseconds.
    pub progress_interval_ms: u64,
    /// Keys requested per listing page.
    #[serde(default = "default_page_size")]
    pub list_page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for FerryConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("downloads"),
            store_root: PathBuf::from("buckets"),
            default_concurrency: DEFAULT_CONCURRENCY,
            progress_interval_ms: 80,
            list_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FerryConfig {
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms.max(1))
    }

    /// `requested` if given, else the configured default; never below 1.
    pub fn concurrency(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_concurrency).max(1)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ferry")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FerryConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] but at an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<FerryConfig> {
    if !path.exists() {
        let default_cfg = FerryConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: FerryConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
