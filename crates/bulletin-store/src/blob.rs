//! Blob backend seam

use crate::error::BlobError;
use async_trait::async_trait;
use std::fmt::Debug;

/// Content type written with every collection document
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Key → bytes object storage
///
/// Implementations must report an absent key as [`BlobError::NotFound`] and
/// nothing else; every other failure is treated as a storage fault.
#[async_trait]
pub trait BlobStore: Debug + Send + Sync {
    /// Read the whole object
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BlobError>;

    /// Replace the whole object unconditionally
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BlobError>;

    /// Backend name for logs
    fn backend(&self) -> &'static str;
}
