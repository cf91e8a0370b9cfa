//! Service configuration
//!
//! Loaded from the process environment at startup. Absent notification
//! settings disable the matching channel rather than failing.

use crate::error::ConfigError;
use bulletin_store::CollectionKeys;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_BUCKET: &str = "S3_BUCKET_NAME";
pub const ENV_EVENTS_KEY: &str = "EVENTS_FILE_KEY";
pub const ENV_SUBSCRIBERS_KEY: &str = "SUBSCRIBERS_FILE_KEY";
pub const ENV_REGISTRATIONS_KEY: &str = "REGISTRATIONS_FILE_KEY";
pub const ENV_TOPIC: &str = "SNS_TOPIC_ARN";
pub const ENV_SENDER: &str = "SES_SENDER_EMAIL";
pub const ENV_DATA_DIR: &str = "BULLETIN_DATA_DIR";

/// Bulletin configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletinConfig {
    /// Bucket holding all three collection documents
    pub bucket: String,
    /// Blob key per collection
    pub keys: CollectionKeys,
    /// Broadcast destination; `None` disables the broadcast channel
    pub topic: Option<String>,
    /// Direct-email sender identity; `None` disables the direct channel
    pub sender: Option<String>,
    /// Root directory of the filesystem blob store
    pub data_dir: PathBuf,
}

impl Default for BulletinConfig {
    fn default() -> Self {
        Self {
            bucket: "bulletin".to_string(),
            keys: CollectionKeys::default(),
            topic: None,
            sender: None,
            data_dir: PathBuf::from("data"),
        }
    }
}

impl BulletinConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the process environment
    ///
    /// # Errors
    /// `ConfigError::Missing` if the bucket name is unset
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup; empty values count as unset
    ///
    /// # Errors
    /// `ConfigError::Missing` if the bucket name is unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let defaults = CollectionKeys::default();

        Ok(Self {
            bucket: get(ENV_BUCKET).ok_or(ConfigError::Missing(ENV_BUCKET))?,
            keys: CollectionKeys {
                events: get(ENV_EVENTS_KEY).unwrap_or(defaults.events),
                subscribers: get(ENV_SUBSCRIBERS_KEY).unwrap_or(defaults.subscribers),
                registrations: get(ENV_REGISTRATIONS_KEY).unwrap_or(defaults.registrations),
            },
            topic: get(ENV_TOPIC),
            sender: get(ENV_SENDER),
            data_dir: get(ENV_DATA_DIR).map_or_else(|| PathBuf::from("data"), PathBuf::from),
        })
    }

    #[inline]
    #[must_use]
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_keys(mut self, keys: CollectionKeys) -> Self {
        self.keys = keys;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }
}
