use super::{parse_body, Handler};
use crate::error::HandlerError;
use crate::pipeline::{check, RegistrationKind};
use crate::services::Services;
use async_trait::async_trait;
use bulletin_model::{Event, RegistrationDraft};
use bulletin_store::{Collection, StoreError};
use serde_json::{json, Value};
use std::sync::Arc;

/// Records attendee registrations
#[derive(Debug, Clone)]
pub struct RegistrationHandler {
    services: Arc<Services>,
}

impl RegistrationHandler {
    #[inline]
    #[must_use]
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }

    /// Look up the name of event `id`; `Ok(None)` if no such event exists
    async fn event_name(&self, id: &str) -> Result<Option<String>, StoreError> {
        let events: Vec<Event> = self.services.store().load(Collection::Events).await?;
        Ok(events.into_iter().find(|e| e.id == id).map(|e| e.name))
    }
}

#[async_trait]
impl Handler for RegistrationHandler {
    fn operation(&self) -> &'static str {
        "register"
    }

    fn storage_failure_message(&self) -> &'static str {
        "Failed to process registration"
    }

    async fn submit(&self, body: Option<&str>) -> Result<Value, HandlerError> {
        let draft = parse_body::<RegistrationDraft>(body)?.normalized();
        let mut draft = check::<RegistrationKind>(draft)?;

        if draft.draft().needs_event_name() {
            let id = draft.draft().event_id.clone().unwrap_or_default();
            match self.event_name(&id).await {
                Ok(Some(name)) => draft = draft.map(|d| d.for_event_name(name)),
                Ok(None) => tracing::debug!(event_id = %id, "no event with this id"),
                Err(e) => tracing::warn!(event_id = %id, error = %e, "could not resolve event name"),
            }
        }

        let registration = self
            .services
            .pipeline()
            .append::<RegistrationKind>(draft)
            .await?;
        Ok(json!({ "message": "Registration successful", "registrationId": registration.id }))
    }
}
