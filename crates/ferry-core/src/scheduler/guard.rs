//! RAII guard that reports a transfer's settlement to the admission loop.

use tokio::sync::mpsc::UnboundedSender;

use crate::transfer::TransferError;

/// Message sent to the admission loop when a transfer settles.
pub(super) struct Settlement {
    pub(super) id: String,
    pub(super) outcome: Result<(), TransferError>,
}

/// Sends a [`Settlement`] when dropped. Dropped without an outcome (the task
/// panicked) it reports [`TransferError::Panicked`], so the loop still evicts
/// the task and backfills its slot.
pub(super) struct SettleGuard {
    id: String,
    outcome: Option<Result<(), TransferError>>,
    tx: UnboundedSender<Settlement>,
}

impl SettleGuard {
    pub(super) fn new(id: String, tx: UnboundedSender<Settlement>) -> Self {
        Self {
            id,
            outcome: None,
            tx,
        }
    }

    pub(super) fn settle(mut self, outcome: Result<(), TransferError>) {
        self.outcome = Some(outcome);
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        let outcome = self.outcome.take().unwrap_or(Err(TransferError::Panicked));
        let _ = self.tx.send(Settlement {
            id: std::mem::take(&mut self.id),
            outcome,
        });
    }
}
