//! In-process blob store

use crate::blob::BlobStore;
use crate::error::BlobError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Object body with the content type it was written with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Blob store held in memory, keyed by bucket and key
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: RwLock<HashMap<(String, String), StoredBlob>>,
}

impl MemoryBlobStore {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object directly
    pub fn insert(&self, bucket: &str, key: &str, body: impl Into<Vec<u8>>) {
        self.objects.write().insert(
            (bucket.to_string(), key.to_string()),
            StoredBlob {
                body: body.into(),
                content_type: crate::blob::JSON_CONTENT_TYPE.to_string(),
            },
        );
    }

    /// Snapshot of one object
    #[must_use]
    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredBlob> {
        self.objects
            .read()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Number of stored objects
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BlobError> {
        self.object(bucket, key)
            .map(|blob| blob.body)
            .ok_or_else(|| BlobError::not_found(bucket, key))
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BlobError> {
        self.objects.write().insert(
            (bucket.to_string(), key.to_string()),
            StoredBlob {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
