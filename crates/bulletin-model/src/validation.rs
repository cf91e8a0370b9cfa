//! Input validation for submitted records
//!
//! Pure checks, no I/O. Each returns the first problem found, in the order
//! the messages are documented on [`ValidationError`].

use crate::error::ValidationError;
use crate::record::{non_empty, EventDraft, RegistrationDraft, SubscriberDraft};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern compiles"));

/// Syntactic email check; says nothing about deliverability
#[inline]
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Exactly `YYYY-MM-DD` and a real calendar day
#[must_use]
pub fn is_calendar_date(date: &str) -> bool {
    DATE_PATTERN.is_match(date) && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

/// Validate an event draft
///
/// # Errors
/// - `ValidationError::MissingFields` listing every absent required field
/// - `ValidationError::InvalidDate` if `date` is not a calendar date
pub fn validate_event(draft: &EventDraft) -> Result<(), ValidationError> {
    let required = [
        ("name", &draft.name),
        ("date", &draft.date),
        ("time", &draft.time),
        ("venue", &draft.venue),
        ("description", &draft.description),
    ];
    let missing: Vec<&'static str> = required
        .iter()
        .filter(|(_, value)| !non_empty(value.as_deref()))
        .map(|(field, _)| *field)
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    match draft.date.as_deref() {
        Some(date) if is_calendar_date(date) => Ok(()),
        _ => Err(ValidationError::InvalidDate),
    }
}

/// Validate a registration draft
///
/// # Errors
/// Name, email presence, email syntax and event reference, checked in that order.
pub fn validate_registration(draft: &RegistrationDraft) -> Result<(), ValidationError> {
    if !non_empty(draft.name.as_deref()) {
        return Err(ValidationError::NameRequired);
    }
    check_email(draft.email.as_deref())?;
    if !non_empty(draft.event_name.as_deref()) && !non_empty(draft.event_id.as_deref()) {
        return Err(ValidationError::EventRequired);
    }
    Ok(())
}

/// Validate a subscription draft
///
/// # Errors
/// `EmailRequired` or `InvalidEmail`
pub fn validate_subscriber(draft: &SubscriberDraft) -> Result<(), ValidationError> {
    check_email(draft.email.as_deref())
}

fn check_email(email: Option<&str>) -> Result<(), ValidationError> {
    match email {
        Some(email) if !email.is_empty() => {
            if is_valid_email(email) {
                Ok(())
            } else {
                Err(ValidationError::InvalidEmail)
            }
        }
        _ => Err(ValidationError::EmailRequired),
    }
}
