//! Test transfers whose settlement is driven by the test through a [`Gate`].

#![allow(dead_code)]

use async_trait::async_trait;
use ferry_core::scheduler::{StatsHandle, StatsSnapshot};
use ferry_core::transfer::{ProgressCounter, TaskBatch, TransferError, TransferStats, TransferTask};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

/// Blocks in `start` until its [`Gate`] is opened.
pub struct GatedTask {
    total: u64,
    progress: ProgressCounter,
    gate: Mutex<Option<oneshot::Receiver<bool>>>,
}

/// Test-side control of one [`GatedTask`].
pub struct Gate {
    tx: Option<oneshot::Sender<bool>>,
    progress: ProgressCounter,
}

impl Gate {
    pub fn succeed(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(true);
        }
    }

    pub fn fail(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(false);
        }
    }

    /// Simulate the transport reporting `n` more bytes.
    pub fn advance(&self, n: u64) {
        self.progress.add(n);
    }
}

pub fn gated(total: u64) -> (Arc<GatedTask>, Gate) {
    let (tx, rx) = oneshot::channel();
    let progress = ProgressCounter::new();
    let task = Arc::new(GatedTask {
        total,
        progress: progress.clone(),
        gate: Mutex::new(Some(rx)),
    });
    (
        task,
        Gate {
            tx: Some(tx),
            progress,
        },
    )
}

#[async_trait]
impl TransferTask for GatedTask {
    async fn start(&self) -> Result<(), TransferError> {
        let rx = self.gate.lock().unwrap().take();
        let Some(rx) = rx else {
            return Err(TransferError::AlreadyStarted);
        };
        match rx.await {
            Ok(true) => Ok(()),
            Ok(false) => Err(TransferError::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "injected failure",
            ))),
            Err(_) => Err(TransferError::Io(io::Error::new(
                io::ErrorKind::Other,
                "gate dropped",
            ))),
        }
    }

    fn stats(&self) -> TransferStats {
        TransferStats::new(self.progress.get(), self.total)
    }
}

/// Batch of gated tasks with the given ids, each `total` bytes.
pub fn gated_batch(ids: &[&str], total: u64) -> (TaskBatch, Vec<Gate>) {
    let mut batch = TaskBatch::new();
    let mut gates = Vec::new();
    for id in ids {
        let (task, gate) = gated(total);
        batch.push(*id, task).unwrap();
        gates.push(gate);
    }
    (batch, gates)
}

pub fn ids(snapshot: &StatsSnapshot) -> Vec<String> {
    snapshot.ids().map(str::to_string).collect()
}

/// Poll `handle` until `pred` holds; panics after five seconds.
pub async fn wait_until(
    handle: &StatsHandle,
    what: &str,
    pred: impl Fn(&StatsSnapshot) -> bool,
) -> StatsSnapshot {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let snapshot = handle.snapshot();
        if pred(&snapshot) {
            return snapshot;
        }
        if tokio::time::Instant::now() > deadline {
            panic!("timed out waiting for {what}; active = {:?}", ids(&snapshot));
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}
