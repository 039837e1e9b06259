//! Errors reported by object store backends.

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no such bucket: {0}")]
    NoSuchBucket(String),

    #[error("no such key: {bucket}/{key}")]
    NoSuchKey { bucket: String, key: String },

    #[error("invalid bucket name: {0}")]
    InvalidBucket(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("short body for {key}: expected {expected} bytes, got {received}")]
    ShortBody {
        key: String,
        expected: u64,
        received: u64,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
