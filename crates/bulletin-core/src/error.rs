//! Error types for Bulletin request handling
//!
//! Provides the taxonomy every handler maps onto a status code:
//! - Validation failures (400)
//! - Duplicate submissions (409)
//! - Storage faults (500, generic body)
//! - Anything else (500, generic body)
//!
//! Notification failures are absent on purpose: they are absorbed by the
//! fan-out and only change the wording of a success response.

use bulletin_model::ValidationError;
use bulletin_store::{Collection, StoreError};

/// Handler failure, classified for the response
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// Malformed or missing input
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Record collides with one already stored
    #[error("conflict: {0}")]
    Conflict(#[from] ConflictError),

    /// Document store unreachable or failing
    #[error("storage failed: {0}")]
    Storage(#[source] StoreError),

    /// Anything not classified above
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl From<StoreError> for HandlerError {
    /// Backend faults are storage errors; a document that does not decode
    /// or encode is unexpected.
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Backend { .. } => Self::Storage(err),
            StoreError::Decode { .. } | StoreError::Encode { .. } => {
                Self::Unexpected(err.to_string())
            }
        }
    }
}

impl HandlerError {
    /// HTTP status for this error
    #[inline]
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Storage(_) | Self::Unexpected(_) => 500,
        }
    }

    /// Never retried by the service itself
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Conflict(_))
    }
}

/// Duplicate registration or subscription
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ConflictError {
    /// Collection that already holds a matching record
    pub collection: Collection,
    /// Text returned to the caller
    pub message: &'static str,
}

impl ConflictError {
    #[inline]
    #[must_use]
    pub fn new(collection: Collection, message: &'static str) -> Self {
        Self {
            collection,
            message,
        }
    }

    /// Response body field carrying the message
    ///
    /// Subscription conflicts answer with `message`, the rest with `error`.
    #[inline]
    #[must_use]
    pub fn body_field(&self) -> &'static str {
        match self.collection {
            Collection::Subscribers => "message",
            Collection::Events | Collection::Registrations => "error",
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Required variable absent or empty
    #[error("missing required setting: {0}")]
    Missing(&'static str),
}
