//! Object store seam.
//!
//! Transfers only talk to a bucket through [`ObjectStore`]: paged listing,
//! streaming GET and streaming PUT. [`LocalObjectStore`] maps buckets to
//! directories and is what the CLI ships with.

mod error;
mod key;
mod local;

use async_trait::async_trait;
use tokio::io::AsyncRead;

pub use error::StoreError;
pub use key::{validate_bucket, validate_key};
pub use local::LocalObjectStore;

/// Default number of keys requested per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// One object as reported by a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub key: String,
    pub size: u64,
}

/// One page of a bucket listing.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub objects: Vec<ObjectInfo>,
    /// Token for the next page; `None` when the listing is exhausted.
    pub next_continuation: Option<String>,
}

/// Destination and options for a PUT.
#[derive(Debug, Clone)]
pub struct PutRequest {
    pub bucket: String,
    pub key: String,
    /// Server-side encryption key id to tag the object with, if any.
    pub sse_kms_key_id: Option<String>,
}

/// Streaming object body returned by GET.
pub type ObjectBody = Box<dyn AsyncRead + Send + Unpin>;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List up to `max_keys` objects after `continuation`, in key order.
    async fn list_page(
        &self,
        bucket: &str,
        continuation: Option<&str>,
        max_keys: usize,
    ) -> Result<ListPage, StoreError>;

    /// Open the body of `bucket/key` for streaming.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectBody, StoreError>;

    /// Store `len` bytes read from `body` under the request's key.
    async fn put_object(
        &self,
        request: &PutRequest,
        body: &mut (dyn AsyncRead + Send + Unpin),
        len: u64,
    ) -> Result<(), StoreError>;

    /// Follow continuation tokens until the whole bucket has been listed.
    async fn list_all(&self, bucket: &str, page_size: usize) -> Result<Vec<ObjectInfo>, StoreError> {
        let mut objects = Vec::new();
        let mut continuation: Option<String> = None;
        loop {
            let page = self
                .list_page(bucket, continuation.as_deref(), page_size.max(1))
                .await?;
            objects.extend(page.objects);
            match page.next_continuation {
                Some(token) => continuation = Some(token),
                None => return Ok(objects),
            }
        }
    }
}
