//! Identifier and timestamp assignment
//!
//! Identifiers are random and never checked against the store; a collision
//! is treated as impossible.

use crate::record::{
    Event, EventDraft, Registration, RegistrationDraft, Subscriber, SubscriberDraft,
    SubscriberStatus,
};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Debug;
use std::sync::Arc;
use uuid::Uuid;

/// Source of the current time
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// How a record kind's identifiers look
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdScheme {
    /// Hyphenated UUID v4
    Uuid,
    /// `sub-` plus the first eight hex digits of a UUID v4
    ShortSubscriber,
}

impl IdScheme {
    /// Generate a fresh identifier
    #[must_use]
    pub fn generate(self) -> String {
        let uuid = Uuid::new_v4();
        match self {
            Self::Uuid => uuid.to_string(),
            Self::ShortSubscriber => {
                let hex = uuid.simple().to_string();
                format!("sub-{}", &hex[..8])
            }
        }
    }
}

/// Builds canonical stored records from validated drafts
#[derive(Debug, Clone)]
pub struct RecordFactory {
    clock: Arc<dyn Clock>,
}

impl Default for RecordFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordFactory {
    /// Factory stamping wall-clock time
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    #[inline]
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Current time as RFC 3339 UTC with microseconds
    #[must_use]
    pub fn timestamp(&self) -> String {
        self.clock
            .now()
            .to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Stored event for a validated draft
    ///
    /// Keeps a non-empty string or numeric client id, otherwise assigns a
    /// UUID. `createdAt` is always stamped here.
    #[must_use]
    pub fn event(&self, draft: EventDraft) -> Event {
        let id = draft.client_id().unwrap_or_else(|| IdScheme::Uuid.generate());
        Event {
            id,
            name: draft.name.unwrap_or_default(),
            date: draft.date.unwrap_or_default(),
            time: draft.time.unwrap_or_default(),
            venue: draft.venue.unwrap_or_default(),
            description: draft.description.unwrap_or_default(),
            created_at: self.timestamp(),
            extra: draft.extra,
        }
    }

    /// Stored registration for a validated draft
    ///
    /// Empty event references are stored as `null`.
    #[must_use]
    pub fn registration(&self, draft: RegistrationDraft) -> Registration {
        Registration {
            id: IdScheme::Uuid.generate(),
            name: draft.name.unwrap_or_default(),
            email: draft.email.unwrap_or_default(),
            event_name: draft.event_name.filter(|v| !v.is_empty()),
            event_id: draft.event_id.filter(|v| !v.is_empty()),
            timestamp: self.timestamp(),
            extra: serde_json::Map::new(),
        }
    }

    /// Stored subscriber for a validated draft, always `confirmed`
    #[must_use]
    pub fn subscriber(&self, draft: SubscriberDraft) -> Subscriber {
        Subscriber {
            id: IdScheme::ShortSubscriber.generate(),
            email: draft.email.unwrap_or_default(),
            timestamp: self.timestamp(),
            status: SubscriberStatus::Confirmed,
            extra: serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug)]
    struct Frozen;

    impl Clock for Frozen {
        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap()
        }
    }

    #[test]
    fn subscriber_ids_are_short_hex() {
        let id = IdScheme::ShortSubscriber.generate();
        assert_eq!(id.len(), 12);
        assert!(id.starts_with("sub-"));
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn uuid_ids_parse() {
        let id = IdScheme::Uuid.generate();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_ne!(id, IdScheme::Uuid.generate());
    }

    #[test]
    fn timestamp_uses_clock() {
        let factory = RecordFactory::with_clock(Arc::new(Frozen));
        assert_eq!(factory.timestamp(), "2025-08-01T12:00:00.000000Z");
    }

    #[test]
    fn event_keeps_client_id_and_overrides_created_at() {
        let factory = RecordFactory::with_clock(Arc::new(Frozen));
        let mut draft = EventDraft::new("Fall Fest", "2025-09-10", "5pm", "Quad", "A").with_id("mine");
        draft.created_at = Some(serde_json::json!("1999-01-01"));
        let event = factory.event(draft);
        assert_eq!(event.id, "mine");
        assert_eq!(event.created_at, "2025-08-01T12:00:00.000000Z");
    }

    #[test]
    fn event_assigns_uuid_for_empty_id() {
        let event = RecordFactory::new()
            .event(EventDraft::new("Fall Fest", "2025-09-10", "5pm", "Quad", "A").with_id(""));
        assert!(Uuid::parse_str(&event.id).is_ok());
    }

    #[test]
    fn subscriber_is_confirmed() {
        let sub = RecordFactory::new().subscriber(SubscriberDraft::new("user@example.com"));
        assert!(sub.is_confirmed());
        assert_eq!(sub.email, "user@example.com");
    }

    #[test]
    fn registration_nulls_empty_event_refs() {
        let draft = RegistrationDraft::new("A", "a@b.com")
            .for_event_name("Fall Fest")
            .for_event_id("");
        let reg = RecordFactory::new().registration(draft);
        assert_eq!(reg.event_name.as_deref(), Some("Fall Fest"));
        assert_eq!(reg.event_id, None);
    }
}
