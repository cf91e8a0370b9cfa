//! Shared wiring for handler integration tests

#![allow(dead_code)]

use bulletin_core::prelude::*;
use bulletin_model::Event;
use bulletin_store::{BlobStore, Collection, CollectionKeys, DocumentStore, MemoryBlobStore};
use bulletin_test_utils::{fixed_factory, RecordingMailer, RecordingTopic, BUCKET};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub const SENDER: &str = "events@campus.edu";

/// Handlers over an in-memory store with recording transports
pub struct Harness {
    pub blobs: Arc<MemoryBlobStore>,
    pub topic: Arc<RecordingTopic>,
    pub mailer: Arc<RecordingMailer>,
    pub handlers: Handlers,
    store: DocumentStore,
}

impl Harness {
    /// Both channels enabled, nothing fails
    pub fn new() -> Self {
        Self::with_transports(RecordingTopic::new(), RecordingMailer::new())
    }

    pub fn with_transports(topic: RecordingTopic, mailer: RecordingMailer) -> Self {
        let blobs = Arc::new(MemoryBlobStore::new());
        let topic = Arc::new(topic);
        let mailer = Arc::new(mailer);
        let store = document_store(Arc::clone(&blobs) as Arc<dyn BlobStore>);

        let services = Services::new(store.clone())
            .with_factory(fixed_factory())
            .with_topic(Arc::clone(&topic) as _)
            .with_mailer(Arc::clone(&mailer) as _, SENDER);

        Self {
            blobs,
            topic,
            mailer,
            handlers: Handlers::new(Arc::new(services)),
            store,
        }
    }

    /// Notifications disabled
    pub fn silent() -> Self {
        let blobs = Arc::new(MemoryBlobStore::new());
        let store = document_store(Arc::clone(&blobs) as Arc<dyn BlobStore>);
        let services = Services::new(store.clone()).with_factory(fixed_factory());
        Self {
            blobs,
            topic: Arc::new(RecordingTopic::new()),
            mailer: Arc::new(RecordingMailer::new()),
            handlers: Handlers::new(Arc::new(services)),
            store,
        }
    }

    pub fn seed(&self, collection: Collection, records: &Value) {
        let key = CollectionKeys::default().key(collection).to_string();
        self.blobs.insert(BUCKET, &key, records.to_string());
    }

    pub fn raw(&self, collection: Collection) -> Option<Vec<u8>> {
        let keys = CollectionKeys::default();
        self.blobs.object(BUCKET, keys.key(collection)).map(|b| b.body)
    }

    pub async fn load<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        self.store.load(collection).await.unwrap()
    }

    pub async fn events(&self) -> Vec<Event> {
        self.load(Collection::Events).await
    }
}

pub fn document_store(blobs: Arc<dyn BlobStore>) -> DocumentStore {
    DocumentStore::new(blobs, BUCKET, CollectionKeys::default())
}

pub async fn post(handler: &impl Handler, body: &str) -> (u16, Value) {
    let response = handler.handle(&ApiRequest::post(body)).await;
    assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
    (response.status_code, response.body_json().unwrap())
}
