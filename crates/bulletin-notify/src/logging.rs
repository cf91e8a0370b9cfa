//! Transports that only write to the log
//!
//! Used by the `bulletin` binary when no real topic or mail relay is wired
//! in; every call succeeds.

use crate::channel::{Mailer, OutgoingEmail, Topic};
use crate::error::NotifyError;
use async_trait::async_trait;

/// Topic that logs each publish and subscription
#[derive(Debug, Clone)]
pub struct LogTopic {
    destination: String,
}

impl LogTopic {
    #[must_use]
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
        }
    }
}

#[async_trait]
impl Topic for LogTopic {
    async fn publish(&self, subject: &str, message: &str) -> Result<(), NotifyError> {
        tracing::info!(
            topic = %self.destination,
            subject,
            bytes = message.len(),
            "topic publish"
        );
        Ok(())
    }

    async fn subscribe_email(&self, email: &str) -> Result<(), NotifyError> {
        tracing::info!(topic = %self.destination, endpoint = email, protocol = "email", "topic subscribe");
        Ok(())
    }
}

/// Mailer that logs each message instead of sending it
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotifyError> {
        tracing::info!(
            from = %email.from,
            to = %email.to,
            subject = %email.subject,
            "email send"
        );
        Ok(())
    }
}
