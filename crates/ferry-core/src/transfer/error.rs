//! Errors a single transfer can settle with.

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("object store: {0}")]
    Store(#[from] StoreError),

    #[error("transfer already started")]
    AlreadyStarted,

    #[error("transfer task panicked")]
    Panicked,
}
