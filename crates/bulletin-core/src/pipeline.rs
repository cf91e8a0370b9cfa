//! Validate → load → dedup → build → append → save
//!
//! One pipeline serves all three record kinds. A [`RecordKind`] supplies
//! the per-kind pieces: field checks, the collision rule, record
//! construction and collection ordering.
//!
//! The pipeline reads the collection immediately before mutating it and
//! writes it back in full. Nothing guards the gap between the two, so a
//! concurrent append to the same collection can be lost.

use crate::error::{ConflictError, HandlerError};
use bulletin_model::{
    dedup, validation, Event, EventDraft, RecordFactory, Registration, RegistrationDraft,
    Subscriber, SubscriberDraft, ValidationError,
};
use bulletin_store::{Collection, DocumentStore};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Per-kind capabilities driving the append pipeline
pub trait RecordKind {
    /// Decoded request body
    type Draft: Send + Sync;
    /// Stored shape
    type Record: Serialize + DeserializeOwned + Clone + Send + Sync;

    /// Collection the records live in
    const COLLECTION: Collection;

    /// Text returned when a draft collides with a stored record
    const CONFLICT_MESSAGE: &'static str = "Record already exists";

    /// Field requirements and format checks
    ///
    /// # Errors
    /// The first problem found with the draft
    fn validate(draft: &Self::Draft) -> Result<(), ValidationError>;

    /// Whether `draft` collides with `existing`
    fn conflicts(_existing: &Self::Record, _draft: &Self::Draft) -> bool {
        false
    }

    /// Assign identifier and timestamp
    fn build(factory: &RecordFactory, draft: Self::Draft) -> Self::Record;

    /// Restore collection ordering after an append
    fn arrange(_records: &mut [Self::Record]) {}

    /// Identifier of a stored record
    fn id(record: &Self::Record) -> &str;
}

/// A draft that passed its kind's validation
#[derive(Debug, Clone, PartialEq)]
pub struct Checked<D>(D);

impl<D> Checked<D> {
    #[inline]
    #[must_use]
    pub fn draft(&self) -> &D {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn into_inner(self) -> D {
        self.0
    }

    /// Adjust a checked draft; callers must not undo what validation required
    pub(crate) fn map(self, f: impl FnOnce(D) -> D) -> Self {
        Self(f(self.0))
    }
}

/// Validate a draft for kind `K`
///
/// # Errors
/// `ValidationError` from the kind's checks
pub fn check<K: RecordKind>(draft: K::Draft) -> Result<Checked<K::Draft>, ValidationError> {
    K::validate(&draft)?;
    Ok(Checked(draft))
}

/// Events: sorted by date, never deduplicated
#[derive(Debug, Clone, Copy)]
pub struct EventKind;

impl RecordKind for EventKind {
    type Draft = EventDraft;
    type Record = Event;

    const COLLECTION: Collection = Collection::Events;

    fn validate(draft: &EventDraft) -> Result<(), ValidationError> {
        validation::validate_event(draft)
    }

    fn build(factory: &RecordFactory, draft: EventDraft) -> Event {
        factory.event(draft)
    }

    /// Stable, so events sharing a date keep their prior order
    fn arrange(records: &mut [Event]) {
        records.sort_by(|a, b| a.date.cmp(&b.date));
    }

    fn id(record: &Event) -> &str {
        &record.id
    }
}

/// Registrations: one per email and event
#[derive(Debug, Clone, Copy)]
pub struct RegistrationKind;

impl RecordKind for RegistrationKind {
    type Draft = RegistrationDraft;
    type Record = Registration;

    const COLLECTION: Collection = Collection::Registrations;
    const CONFLICT_MESSAGE: &'static str = "You are already registered for this event";

    fn validate(draft: &RegistrationDraft) -> Result<(), ValidationError> {
        validation::validate_registration(draft)
    }

    fn conflicts(existing: &Registration, draft: &RegistrationDraft) -> bool {
        dedup::is_duplicate_registration(existing, draft)
    }

    fn build(factory: &RecordFactory, draft: RegistrationDraft) -> Registration {
        factory.registration(draft)
    }

    fn id(record: &Registration) -> &str {
        &record.id
    }
}

/// Subscribers: one per email
#[derive(Debug, Clone, Copy)]
pub struct SubscriberKind;

impl RecordKind for SubscriberKind {
    type Draft = SubscriberDraft;
    type Record = Subscriber;

    const COLLECTION: Collection = Collection::Subscribers;
    const CONFLICT_MESSAGE: &'static str = "You are already subscribed to our newsletter";

    fn validate(draft: &SubscriberDraft) -> Result<(), ValidationError> {
        validation::validate_subscriber(draft)
    }

    fn conflicts(existing: &Subscriber, draft: &SubscriberDraft) -> bool {
        draft
            .email
            .as_deref()
            .is_some_and(|email| dedup::is_duplicate_subscriber(existing, email))
    }

    fn build(factory: &RecordFactory, draft: SubscriberDraft) -> Subscriber {
        factory.subscriber(draft)
    }

    fn id(record: &Subscriber) -> &str {
        &record.id
    }
}

/// Appends checked drafts to their collection
#[derive(Debug, Clone, Copy)]
pub struct AppendPipeline<'a> {
    store: &'a DocumentStore,
    factory: &'a RecordFactory,
}

impl<'a> AppendPipeline<'a> {
    #[inline]
    #[must_use]
    pub fn new(store: &'a DocumentStore, factory: &'a RecordFactory) -> Self {
        Self { store, factory }
    }

    /// Load, dedup, build, append, arrange and save
    ///
    /// # Returns
    /// The record as stored
    ///
    /// # Errors
    /// - `HandlerError::Conflict` on the first colliding stored record; nothing is written
    /// - `HandlerError::Storage` / `Unexpected` if the load or save fails
    pub async fn append<K: RecordKind>(
        &self,
        draft: Checked<K::Draft>,
    ) -> Result<K::Record, HandlerError> {
        let draft = draft.into_inner();
        let mut records: Vec<K::Record> = self.store.load(K::COLLECTION).await?;

        if records.iter().any(|existing| K::conflicts(existing, &draft)) {
            tracing::info!(collection = %K::COLLECTION, "duplicate submission rejected");
            return Err(ConflictError::new(K::COLLECTION, K::CONFLICT_MESSAGE).into());
        }

        let record = K::build(self.factory, draft);
        records.push(record.clone());
        K::arrange(&mut records);
        self.store.save(K::COLLECTION, &records).await?;

        tracing::info!(
            collection = %K::COLLECTION,
            id = K::id(&record),
            total = records.len(),
            "record appended"
        );
        Ok(record)
    }
}
