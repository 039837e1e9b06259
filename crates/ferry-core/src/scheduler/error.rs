use crate::transfer::TransferError;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("scheduler already started")]
    AlreadyStarted,

    /// At least one transfer failed; reported only after every transfer settled.
    #[error("{failed} of {total} transfers failed, first was {id}")]
    TaskFailed {
        id: String,
        failed: usize,
        total: usize,
        #[source]
        source: TransferError,
    },
}
