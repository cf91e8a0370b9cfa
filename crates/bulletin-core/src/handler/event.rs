use super::{parse_body, Handler};
use crate::error::HandlerError;
use crate::pipeline::{check, EventKind};
use crate::services::Services;
use async_trait::async_trait;
use bulletin_model::EventDraft;
use serde_json::{json, Value};
use std::sync::Arc;

const CREATED: &str = "Event added successfully!";
const NOTIFIED: &str = " Subscribers have been notified.";

/// Publishes new events and announces them to subscribers
#[derive(Debug, Clone)]
pub struct EventHandler {
    services: Arc<Services>,
}

impl EventHandler {
    #[inline]
    #[must_use]
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Handler for EventHandler {
    fn operation(&self) -> &'static str {
        "create_event"
    }

    fn storage_failure_message(&self) -> &'static str {
        "Failed to process event"
    }

    async fn submit(&self, body: Option<&str>) -> Result<Value, HandlerError> {
        let draft = check::<EventKind>(parse_body::<EventDraft>(body)?)?;
        let event = self.services.pipeline().append::<EventKind>(draft).await?;

        // The event is stored; nothing past this point can fail the request.
        let report = self.services.fanout().announce(&event).await;

        let message = if report.notification_sent() {
            format!("{CREATED}{NOTIFIED}")
        } else {
            CREATED.to_string()
        };
        Ok(json!({ "message": message, "eventId": event.id }))
    }
}
