use super::{parse_body, Handler};
use crate::error::HandlerError;
use crate::pipeline::{check, SubscriberKind};
use crate::services::Services;
use async_trait::async_trait;
use bulletin_model::SubscriberDraft;
use serde_json::{json, Value};
use std::sync::Arc;

/// Adds newsletter subscribers
#[derive(Debug, Clone)]
pub struct SubscriptionHandler {
    services: Arc<Services>,
}

impl SubscriptionHandler {
    #[inline]
    #[must_use]
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Handler for SubscriptionHandler {
    fn operation(&self) -> &'static str {
        "subscribe"
    }

    fn storage_failure_message(&self) -> &'static str {
        "Failed to process subscription"
    }

    async fn submit(&self, body: Option<&str>) -> Result<Value, HandlerError> {
        let draft = check::<SubscriberKind>(parse_body::<SubscriberDraft>(body)?)?;
        let subscriber = self.services.pipeline().append::<SubscriberKind>(draft).await?;

        if let Some(topic) = self.services.topic() {
            if let Err(e) = topic.subscribe_email(&subscriber.email).await {
                tracing::warn!(email = %subscriber.email, error = %e, "topic subscription failed");
            }
        }

        Ok(json!({
            "message": "Successfully subscribed to our newsletter!",
            "subscriberId": subscriber.id,
        }))
    }
}
