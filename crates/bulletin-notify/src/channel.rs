//! Transport seams for the two notification channels

use crate::error::NotifyError;
use async_trait::async_trait;
use std::fmt::Debug;

/// Broadcast destination that fans a message out to its own subscribers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Topic: Debug + Send + Sync {
    /// Publish one message with a subject line
    async fn publish(&self, subject: &str, message: &str) -> Result<(), NotifyError>;

    /// Add an email endpoint to the topic's own subscription list
    async fn subscribe_email(&self, email: &str) -> Result<(), NotifyError>;
}

/// A single rich email with a plain-text alternative
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Direct email transport
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Debug + Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotifyError>;
}
