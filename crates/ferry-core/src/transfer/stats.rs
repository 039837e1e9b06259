//! Per-task progress counters and the stats snapshot derived from them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Point-in-time progress of one transfer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferStats {
    /// Bytes moved so far.
    pub bytes_transferred: u64,
    /// Size recorded when the task was built (object size or local file size).
    pub total_size: u64,
}

impl TransferStats {
    pub fn new(bytes_transferred: u64, total_size: u64) -> Self {
        Self {
            bytes_transferred,
            total_size,
        }
    }

    /// `bytes_transferred / total_size * 100`, not clamped.
    ///
    /// Exceeds 100 when the transport delivers more bytes than the recorded
    /// size. A zero-byte transfer reports 100.
    pub fn percent_progress(&self) -> f64 {
        if self.total_size == 0 {
            return 100.0;
        }
        self.bytes_transferred as f64 / self.total_size as f64 * 100.0
    }
}

/// Shared byte counter updated by the transport as chunks move.
///
/// Cloning shares the same counter; reads never block writers.
#[derive(Debug, Clone, Default)]
pub struct ProgressCounter {
    bytes: Arc<AtomicU64>,
}

impl ProgressCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `n` bytes; returns the new total.
    pub fn add(&self, n: u64) -> u64 {
        self.bytes.fetch_add(n, Ordering::Relaxed) + n
    }

    pub fn get(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_matches_ratio() {
        let stats = TransferStats::new(256, 1024);
        assert!((stats.percent_progress() - 25.0).abs() < 1e-9);
        let stats = TransferStats::new(1, 3);
        assert!((stats.percent_progress() - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn percent_can_exceed_hundred_on_stale_size() {
        let stats = TransferStats::new(150, 100);
        assert!((stats.percent_progress() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn zero_size_reports_complete() {
        assert_eq!(TransferStats::new(0, 0).percent_progress(), 100.0);
    }

    #[test]
    fn counter_clones_share_total() {
        let counter = ProgressCounter::new();
        let other = counter.clone();
        assert_eq!(counter.add(10), 10);
        assert_eq!(other.add(5), 15);
        assert_eq!(counter.get(), 15);
    }
}
