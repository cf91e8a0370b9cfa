//! Bulletin Store
//!
//! A document store made of one JSON array per collection, each kept as a
//! single blob in a shared bucket.
//!
//! - [`BlobStore`]: key → bytes with a distinct not-found signal
//! - [`MemoryBlobStore`], [`FsBlobStore`]: the two provided backends
//! - [`DocumentStore`]: whole-collection load and save
//!
//! # Concurrency
//!
//! Saves are unconditional full replacements. Two callers that load the
//! same state and then save will lose one of their appends; the last save
//! wins. Callers load immediately before mutating and never cache a
//! collection across operations.
//!
//! # Example
//!
//! ```rust,ignore
//! use bulletin_store::{Collection, CollectionKeys, DocumentStore, MemoryBlobStore};
//! use std::sync::Arc;
//!
//! let store = DocumentStore::new(Arc::new(MemoryBlobStore::new()), "campus", CollectionKeys::default());
//! let mut events: Vec<serde_json::Value> = store.load(Collection::Events).await?;
//! events.push(serde_json::json!({"id": "e1"}));
//! store.save(Collection::Events, &events).await?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod blob;
mod document;
mod error;
mod fs;
mod memory;

pub use blob::{BlobStore, JSON_CONTENT_TYPE};
pub use document::{Collection, CollectionKeys, DocumentStore};
pub use error::{BlobError, StoreError};
pub use fs::FsBlobStore;
pub use memory::{MemoryBlobStore, StoredBlob};
