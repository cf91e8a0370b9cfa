//! Testing utilities for the Bulletin workspace
//!
//! Substitute clock, transports and blob store, plus request-body fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use bulletin_model::{Clock, RecordFactory};
use bulletin_notify::{Mailer, NotifyError, OutgoingEmail, Topic};
use bulletin_store::{BlobError, BlobStore, MemoryBlobStore};
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;

pub const BUCKET: &str = "campus-bulletin";

/// Clock stuck at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).single().unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Record factory stamping every record with [`FixedClock::default`]
pub fn fixed_factory() -> RecordFactory {
    RecordFactory::with_clock(Arc::new(FixedClock::default()))
}

/// Topic that records calls and optionally fails them
#[derive(Debug, Default)]
pub struct RecordingTopic {
    fail: bool,
    published: Mutex<Vec<(String, String)>>,
    subscribed: Mutex<Vec<String>>,
}

impl RecordingTopic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call returns an error (still recorded)
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// `(subject, message)` per publish call
    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().clone()
    }

    pub fn subscribed(&self) -> Vec<String> {
        self.subscribed.lock().clone()
    }
}

#[async_trait]
impl Topic for RecordingTopic {
    async fn publish(&self, subject: &str, message: &str) -> Result<(), NotifyError> {
        self.published
            .lock()
            .push((subject.to_string(), message.to_string()));
        if self.fail {
            return Err(NotifyError::topic("test-topic", "publish refused"));
        }
        Ok(())
    }

    async fn subscribe_email(&self, email: &str) -> Result<(), NotifyError> {
        self.subscribed.lock().push(email.to_string());
        if self.fail {
            return Err(NotifyError::topic("test-topic", "subscribe refused"));
        }
        Ok(())
    }
}

/// Mailer that records every send and fails for chosen recipients
#[derive(Debug, Default)]
pub struct RecordingMailer {
    failing_for: HashSet<String>,
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail sends addressed to any of `emails`
    pub fn failing_for<'a>(emails: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            failing_for: emails.into_iter().map(str::to_string).collect(),
            ..Self::default()
        }
    }

    /// Every attempted send, failed ones included
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().clone()
    }

    pub fn recipients(&self) -> Vec<String> {
        self.sent.lock().iter().map(|m| m.to.clone()).collect()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotifyError> {
        self.sent.lock().push(email.clone());
        if self.failing_for.contains(&email.to) {
            return Err(NotifyError::delivery(&email.to, "mailbox unavailable"));
        }
        Ok(())
    }
}

/// Memory store whose reads and/or writes fail for chosen keys
#[derive(Debug, Default)]
pub struct FailingBlobStore {
    inner: MemoryBlobStore,
    failing_reads: HashSet<String>,
    failing_writes: HashSet<String>,
}

impl FailingBlobStore {
    pub fn new(inner: MemoryBlobStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn fail_reads(mut self, key: &str) -> Self {
        self.failing_reads.insert(key.to_string());
        self
    }

    #[must_use]
    pub fn fail_writes(mut self, key: &str) -> Self {
        self.failing_writes.insert(key.to_string());
        self
    }

    pub fn inner(&self) -> &MemoryBlobStore {
        &self.inner
    }
}

#[async_trait]
impl BlobStore for FailingBlobStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BlobError> {
        if self.failing_reads.contains(key) {
            return Err(BlobError::Backend(format!("read refused for {key}")));
        }
        self.inner.get(bucket, key).await
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BlobError> {
        if self.failing_writes.contains(key) {
            return Err(BlobError::Backend(format!("write refused for {key}")));
        }
        self.inner.put(bucket, key, body, content_type).await
    }

    fn backend(&self) -> &'static str {
        "failing-memory"
    }
}

/// Event creation body with every required field
pub fn event_body(name: &str, date: &str) -> String {
    json!({
        "name": name,
        "date": date,
        "time": "6:00 PM",
        "venue": "Student Center",
        "description": format!("{name} on the main quad"),
    })
    .to_string()
}

pub fn registration_by_name(name: &str, email: &str, event_name: &str) -> String {
    json!({ "name": name, "email": email, "eventName": event_name }).to_string()
}

pub fn registration_by_id(name: &str, email: &str, event_id: &str) -> String {
    json!({ "name": name, "email": email, "eventId": event_id }).to_string()
}

pub fn subscription_body(email: &str) -> String {
    json!({ "email": email }).to_string()
}

/// A stored subscriber document entry
pub fn subscriber_record(id: &str, email: &str, status: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "timestamp": "2025-07-01T00:00:00.000000Z",
        "status": status,
    })
}
