use crate::scheduler::{BatchSummary, StatsSnapshot};

/// `[index]: id - 12.34%` per active transfer, indexed by snapshot order.
pub fn render_lines(snapshot: &StatsSnapshot) -> Vec<String> {
    snapshot
        .iter()
        .enumerate()
        .map(|(index, (id, stats))| {
            format!("[{}]: {} - {:.2}%", index, id, stats.percent_progress())
        })
        .collect()
}

/// One-line summary printed after a successful batch.
pub fn render_summary(summary: &BatchSummary) -> String {
    let mib = summary.bytes_transferred as f64 / 1_048_576.0;
    format!("{} file(s), {:.2} MiB transferred", summary.transfers, mib)
}
