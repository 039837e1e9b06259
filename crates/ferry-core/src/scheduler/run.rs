//! Admission loop: keep up to `limit` transfers in flight, backfill in batch
//! order as they settle, report the first failure once all have settled.

use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockWriteGuard};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinSet;

use crate::transfer::{BatchEntry, TaskBatch, TransferError, TransferTask};

use super::active::{ActiveSet, StatsHandle, StatsSnapshot};
use super::error::SchedulerError;
use super::guard::{SettleGuard, Settlement};
use super::DEFAULT_CONCURRENCY;

/// Outcome of a batch in which every transfer succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub transfers: usize,
    pub bytes_transferred: u64,
}

/// Runs one batch under a concurrency cap. Single use: `start` may be called
/// once.
pub struct Scheduler {
    queue: Mutex<Option<Vec<BatchEntry>>>,
    limit: usize,
    active: Arc<RwLock<ActiveSet>>,
}

impl Scheduler {
    /// `limit` of 0 is treated as 1.
    pub fn new(batch: TaskBatch, limit: usize) -> Self {
        Self {
            queue: Mutex::new(Some(batch.into_entries())),
            limit: limit.max(1),
            active: Arc::new(RwLock::new(ActiveSet::default())),
        }
    }

    pub fn with_default_limit(batch: TaskBatch) -> Self {
        Self::new(batch, DEFAULT_CONCURRENCY)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Stats of every transfer currently active. Empty before `start` and
    /// after it resolves.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats_handle().snapshot()
    }

    pub fn stats_handle(&self) -> StatsHandle {
        StatsHandle {
            active: Arc::clone(&self.active),
        }
    }

    /// Runs every transfer in the batch and resolves once all have settled.
    ///
    /// Failures never stop admissions or cancel running transfers; the first
    /// one (in settlement order) is returned after the last transfer settles.
    pub async fn start(&self) -> Result<BatchSummary, SchedulerError> {
        let entries = self
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(SchedulerError::AlreadyStarted)?;
        let total = entries.len();
        let mut pending = entries.into_iter();

        let (tx, mut rx) = mpsc::unbounded_channel::<Settlement>();
        let mut join_set = JoinSet::new();

        tracing::info!(transfers = total, limit = self.limit, "scheduler starting");
        {
            let mut active = self.write_active();
            self.admit(&mut active, &mut pending, &mut join_set, &tx);
        }

        let mut settled = 0usize;
        let mut failed = 0usize;
        let mut bytes_transferred = 0u64;
        let mut first_failure: Option<(String, TransferError)> = None;

        while settled < total {
            // `tx` is held here, so the channel cannot close early.
            let Some(Settlement { id, outcome }) = rx.recv().await else {
                break;
            };
            settled += 1;
            {
                let mut active = self.write_active();
                if let Some(task) = active.remove(&id) {
                    bytes_transferred += task.stats().bytes_transferred;
                }
                self.admit(&mut active, &mut pending, &mut join_set, &tx);
            }

            match outcome {
                Ok(()) => tracing::debug!(id = %id, settled, total, "transfer finished"),
                Err(err) => {
                    failed += 1;
                    tracing::warn!(id = %id, error = %err, "transfer failed");
                    if first_failure.is_none() {
                        first_failure = Some((id, err));
                    }
                }
            }
        }

        while let Some(res) = join_set.join_next().await {
            if let Err(e) = res {
                tracing::debug!("transfer task join: {}", e);
            }
        }

        match first_failure {
            Some((id, source)) => {
                tracing::warn!(failed, total, "batch finished with failures");
                Err(SchedulerError::TaskFailed {
                    id,
                    failed,
                    total,
                    source,
                })
            }
            None => {
                tracing::info!(transfers = total, bytes_transferred, "batch finished");
                Ok(BatchSummary {
                    transfers: total,
                    bytes_transferred,
                })
            }
        }
    }

    fn write_active(&self) -> RwLockWriteGuard<'_, ActiveSet> {
        self.active.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fill free slots from `pending`. Each task is listed before it is spawned.
    fn admit(
        &self,
        active: &mut ActiveSet,
        pending: &mut impl Iterator<Item = BatchEntry>,
        join_set: &mut JoinSet<()>,
        tx: &UnboundedSender<Settlement>,
    ) {
        while active.len() < self.limit {
            let Some(entry) = pending.next() else {
                break;
            };
            active.insert(entry.id.clone(), Arc::clone(&entry.task));
            tracing::debug!(id = %entry.id, active = active.len(), "admitted transfer");
            let guard = SettleGuard::new(entry.id, tx.clone());
            join_set.spawn(run_transfer(entry.task, guard));
        }
    }
}

async fn run_transfer(task: Arc<dyn TransferTask>, guard: SettleGuard) {
    let outcome = task.start().await;
    guard.settle(outcome);
}
