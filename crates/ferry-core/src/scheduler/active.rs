//! The live set of admitted transfers and read-only snapshots of it.

use std::sync::{Arc, PoisonError, RwLock};

use crate::transfer::{TransferStats, TransferTask};

/// Identifier → running task, in admission order.
///
/// Bounded by the scheduler's limit, so a vector beats a map here and keeps
/// snapshot enumeration order stable.
#[derive(Default)]
pub(super) struct ActiveSet {
    entries: Vec<(String, Arc<dyn TransferTask>)>,
}

impl ActiveSet {
    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(super) fn insert(&mut self, id: String, task: Arc<dyn TransferTask>) {
        self.entries.push((id, task));
    }

    pub(super) fn remove(&mut self, id: &str) -> Option<Arc<dyn TransferTask>> {
        let pos = self.entries.iter().position(|(k, _)| k == id)?;
        Some(self.entries.remove(pos).1)
    }

    fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            entries: self
                .entries
                .iter()
                .map(|(id, task)| (id.clone(), task.stats()))
                .collect(),
        }
    }
}

/// Point-in-time stats of every active transfer, in admission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSnapshot {
    entries: Vec<(String, TransferStats)>,
}

impl StatsSnapshot {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TransferStats> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, s)| s)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TransferStats)> {
        self.entries.iter().map(|(k, s)| (k.as_str(), s))
    }
}

/// Cloneable read-only view of a scheduler's active set.
///
/// Reading never blocks the admission loop for longer than one snapshot copy.
#[derive(Clone)]
pub struct StatsHandle {
    pub(super) active: Arc<RwLock<ActiveSet>>,
}

impl StatsHandle {
    pub fn snapshot(&self) -> StatsSnapshot {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }
}
