//! Progress reporting: poll a scheduler's active set on a fixed cadence and
//! redraw one line per active transfer.
//!
//! The reporter only ever reads through a [`StatsHandle`]; it cannot touch
//! the active set and never holds its lock between ticks.

mod render;
mod sink;

use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::scheduler::StatsHandle;

pub use render::{render_lines, render_summary};
pub use sink::{ProgressSink, RecordingSink, TerminalSink};

/// Redraw cadence used when none is configured.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(80);

/// Background polling loop. Stop it with [`ProgressReporter::stop`] once the
/// scheduler's `start` future has resolved.
pub struct ProgressReporter {
    stop_tx: oneshot::Sender<()>,
    handle: JoinHandle<usize>,
}

impl ProgressReporter {
    /// Spawn the polling loop on the current tokio runtime.
    pub fn spawn<S>(stats: StatsHandle, interval: Duration, mut sink: S) -> Self
    where
        S: ProgressSink + Send + 'static,
    {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let interval = interval.max(Duration::from_millis(1));
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut frames = 0usize;
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let lines = render_lines(&stats.snapshot());
                        sink.draw(&lines);
                        frames += 1;
                    }
                }
            }
            sink.clear();
            frames
        });
        Self { stop_tx, handle }
    }

    /// Stop polling, clear the rendered region and return the number of frames
    /// drawn. Consumes the reporter, so it can only be stopped once.
    pub async fn stop(self) -> usize {
        let _ = self.stop_tx.send(());
        match self.handle.await {
            Ok(frames) => frames,
            Err(e) => {
                tracing::warn!("progress reporter join: {}", e);
                0
            }
        }
    }
}
