//! Whole-document JSON collections
//!
//! Every collection is one pretty-printed JSON array. There is no partial
//! update: a save rewrites the full array and no version token is read or
//! checked, so concurrent writers race and the last save wins.

use crate::blob::{BlobStore, JSON_CONTENT_TYPE};
use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The three record collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Events,
    Subscribers,
    Registrations,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Events => "events",
            Self::Subscribers => "subscribers",
            Self::Registrations => "registrations",
        };
        f.write_str(name)
    }
}

/// Blob key of each collection document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionKeys {
    pub events: String,
    pub subscribers: String,
    pub registrations: String,
}

impl Default for CollectionKeys {
    fn default() -> Self {
        Self {
            events: "events.json".to_string(),
            subscribers: "subscribers.json".to_string(),
            registrations: "registrations.json".to_string(),
        }
    }
}

impl CollectionKeys {
    /// Key for a collection
    #[inline]
    #[must_use]
    pub fn key(&self, collection: Collection) -> &str {
        match collection {
            Collection::Events => &self.events,
            Collection::Subscribers => &self.subscribers,
            Collection::Registrations => &self.registrations,
        }
    }
}

/// Load/save access to collection documents in one bucket
#[derive(Debug, Clone)]
pub struct DocumentStore {
    blobs: Arc<dyn BlobStore>,
    bucket: String,
    keys: CollectionKeys,
}

impl DocumentStore {
    #[must_use]
    pub fn new(blobs: Arc<dyn BlobStore>, bucket: impl Into<String>, keys: CollectionKeys) -> Self {
        Self {
            blobs,
            bucket: bucket.into(),
            keys,
        }
    }

    #[inline]
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    #[inline]
    #[must_use]
    pub fn keys(&self) -> &CollectionKeys {
        &self.keys
    }

    /// Read every record of a collection
    ///
    /// A document that was never written loads as an empty collection.
    ///
    /// # Errors
    /// - `StoreError::Backend` for any backend failure other than not-found
    /// - `StoreError::Decode` if the document is not an array of `T`
    pub async fn load<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<T>, StoreError> {
        let key = self.keys.key(collection);
        let body = match self.blobs.get(&self.bucket, key).await {
            Ok(body) => body,
            Err(e) if e.is_not_found() => {
                tracing::debug!(%collection, key, "collection document absent, treating as empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Backend {
                    key: key.to_string(),
                    source,
                })
            }
        };

        serde_json::from_slice(&body).map_err(|source| StoreError::Decode {
            key: key.to_string(),
            source,
        })
    }

    /// Overwrite a collection with `records`
    ///
    /// # Errors
    /// - `StoreError::Encode` if a record cannot be serialized
    /// - `StoreError::Backend` if the write fails
    pub async fn save<T: Serialize>(
        &self,
        collection: Collection,
        records: &[T],
    ) -> Result<(), StoreError> {
        let key = self.keys.key(collection);
        let body = serde_json::to_vec_pretty(records).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;

        self.blobs
            .put(&self.bucket, key, body, JSON_CONTENT_TYPE)
            .await
            .map_err(|source| StoreError::Backend {
                key: key.to_string(),
                source,
            })?;

        tracing::debug!(
            %collection,
            key,
            records = records.len(),
            backend = self.blobs.backend(),
            "saved collection"
        );
        Ok(())
    }
}
