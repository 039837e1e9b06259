//! Bounded-concurrency transfer scheduler.
//!
//! Admits tasks from a [`TaskBatch`](crate::transfer::TaskBatch) in batch
//! order while fewer than `limit` are active; when one settles it is evicted
//! and the next queued task is admitted in the same critical section. The
//! active set can be read at any time through [`Scheduler::stats`] or a
//! [`StatsHandle`].

mod active;
mod error;
mod guard;
mod run;

pub use active::{StatsHandle, StatsSnapshot};
pub use error::SchedulerError;
pub use run::{BatchSummary, Scheduler};

/// Concurrency limit used when the caller does not supply one.
pub const DEFAULT_CONCURRENCY: usize = 4;
