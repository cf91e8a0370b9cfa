//! Notification errors
//!
//! These are caught at the individual send and logged; they never reach a
//! request handler's caller.

/// Failure of a broadcast or direct send
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    /// Topic publish or subscribe was rejected
    #[error("topic '{topic}' rejected request: {reason}")]
    Topic { topic: String, reason: String },

    /// Mail transport refused a message
    #[error("could not send email to {recipient}: {reason}")]
    Delivery { recipient: String, reason: String },

    /// Transport unreachable
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

impl NotifyError {
    pub fn topic(topic: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Topic {
            topic: topic.into(),
            reason: reason.into(),
        }
    }

    pub fn delivery(recipient: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Delivery {
            recipient: recipient.into(),
            reason: reason.into(),
        }
    }
}
