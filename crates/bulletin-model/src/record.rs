//! Stored record shapes and the request drafts they are built from
//!
//! Stored records keep any fields they do not model in a flattened `extra`
//! map so a collection document round-trips without loss.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A published event
///
/// ```json
/// {
///   "id": "0f8e3c1a-...",
///   "name": "Fall Fest",
///   "date": "2025-09-10",
///   "time": "5pm",
///   "venue": "Quad",
///   "description": "Games and food",
///   "createdAt": "2025-08-01T12:00:00.000000Z",
///   "image": "assets/social.jpg"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Numeric ids written by older clients load as their decimal text
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    pub name: String,
    /// Calendar date, `YYYY-MM-DD`; the collection sort key
    pub date: String,
    /// Free text, e.g. `5pm`
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: String,
    /// Client fields such as `type`, `shortDescription` or `image`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Newsletter subscriber lifecycle state
///
/// Stored as a lowercase string. Values this crate does not know are kept
/// verbatim in `Other` so one odd record never makes the collection unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubscriberStatus {
    /// The only state new subscriptions are created in
    Confirmed,
    Pending,
    Unsubscribed,
    Other(String),
}

impl SubscriberStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Pending => "pending",
            Self::Unsubscribed => "unsubscribed",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for SubscriberStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "confirmed" => Self::Confirmed,
            "pending" => Self::Pending,
            "unsubscribed" => Self::Unsubscribed,
            _ => Self::Other(raw),
        }
    }
}

impl From<SubscriberStatus> for String {
    fn from(status: SubscriberStatus) -> Self {
        match status {
            SubscriberStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// A newsletter subscriber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    /// `sub-` followed by eight hex characters
    pub id: String,
    pub email: String,
    pub timestamp: String,
    pub status: SubscriberStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Subscriber {
    /// Whether direct notifications go to this subscriber
    #[inline]
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.status == SubscriberStatus::Confirmed
    }
}

/// A registration for an event
///
/// `eventName` and `eventId` are written as `null` when unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub event_id: Option<String>,
    pub timestamp: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Event creation request body
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    /// Kept when a non-empty string or a number; anything else is replaced
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Ignored; creation time is always stamped server-side
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventDraft {
    /// Draft with every required field set
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
        venue: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            date: Some(date.into()),
            time: Some(time.into()),
            venue: Some(venue.into()),
            description: Some(description.into()),
            ..Self::default()
        }
    }

    /// With a client-chosen identifier
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(Value::String(id.into()));
        self
    }

    /// Client-chosen id as stored text, if usable
    #[must_use]
    pub fn client_id(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Registration request body
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub event_id: Option<String>,
}

impl RegistrationDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn for_event_name(mut self, event_name: impl Into<String>) -> Self {
        self.event_name = Some(event_name.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn for_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    /// Empty event references become absent, matching how they are stored
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.event_name = self.event_name.filter(|v| !v.is_empty());
        self.event_id = self.event_id.filter(|v| !v.is_empty());
        self
    }

    /// `eventId` was given but no usable `eventName`
    #[must_use]
    pub fn needs_event_name(&self) -> bool {
        non_empty(self.event_id.as_deref()) && !non_empty(self.event_name.as_deref())
    }
}

/// Subscription request body
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubscriberDraft {
    #[serde(default)]
    pub email: Option<String>,
}

impl SubscriberDraft {
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
        }
    }
}

fn id_text<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("event id must be a string, got {other}"))),
    }
}

/// Present and not the empty string
#[inline]
pub(crate) fn non_empty(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
