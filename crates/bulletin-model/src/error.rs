//! Validation errors
//!
//! Every variant renders the exact message returned to the caller in a
//! 400 response body.

/// Field-level rejection of a submitted record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// One or more required event fields are absent or empty
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Event date is not a `YYYY-MM-DD` calendar date
    #[error("Invalid date format. Use YYYY-MM-DD.")]
    InvalidDate,

    #[error("Name is required")]
    NameRequired,

    #[error("Email is required")]
    EmailRequired,

    #[error("Invalid email format")]
    InvalidEmail,

    /// Neither `eventName` nor `eventId` was supplied
    #[error("Event information is required")]
    EventRequired,

    /// Body is not a JSON object with string-valued fields
    #[error("Invalid request body")]
    MalformedBody,
}
