//! Collision rules applied before a record is appended
//!
//! Both rules are exact, case-sensitive string comparisons applied by a
//! linear scan that stops at the first match.

use crate::record::{Registration, RegistrationDraft, Subscriber};

/// Same email and the same event by either identity
///
/// The event comparison is disjunctive: equal `eventId` OR equal `eventName`.
/// Both sides are optional and compared as options, so two registrations
/// that both lack an `eventId` count as the same event.
#[must_use]
pub fn is_duplicate_registration(existing: &Registration, candidate: &RegistrationDraft) -> bool {
    candidate.email.as_deref() == Some(existing.email.as_str())
        && (existing.event_id == candidate.event_id || existing.event_name == candidate.event_name)
}

/// Same email address
#[inline]
#[must_use]
pub fn is_duplicate_subscriber(existing: &Subscriber, candidate_email: &str) -> bool {
    existing.email == candidate_email
}

/// First stored registration colliding with `candidate`
#[must_use]
pub fn find_registration_conflict<'a>(
    existing: &'a [Registration],
    candidate: &RegistrationDraft,
) -> Option<&'a Registration> {
    existing
        .iter()
        .find(|reg| is_duplicate_registration(reg, candidate))
}

/// First stored subscriber with `candidate_email`
#[must_use]
pub fn find_subscriber_conflict<'a>(
    existing: &'a [Subscriber],
    candidate_email: &str,
) -> Option<&'a Subscriber> {
    existing
        .iter()
        .find(|sub| is_duplicate_subscriber(sub, candidate_email))
}
