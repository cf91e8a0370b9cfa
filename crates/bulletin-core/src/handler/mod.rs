//! Request handlers
//!
//! Each handler takes an API-gateway-shaped request and always answers with
//! a response; no error escapes [`Handler::handle`]. Status mapping:
//!
//! | outcome | status | body |
//! |---|---|---|
//! | `OPTIONS` preflight | 200 | `{"message": ...}` |
//! | stored | 200 | message plus the new record id |
//! | validation | 400 | `{"error": ...}` |
//! | duplicate | 409 | `{"error": ...}` or `{"message": ...}` |
//! | storage / unexpected / panic | 500 | generic `{"error": ...}` |

mod event;
mod registration;
mod subscription;

pub use event::EventHandler;
pub use registration::RegistrationHandler;
pub use subscription::SubscriptionHandler;

use crate::error::HandlerError;
use crate::services::Services;
use async_trait::async_trait;
use bulletin_model::ValidationError;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Fixed CORS headers present on every response
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Headers", "Content-Type"),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
];

const PREFLIGHT_MESSAGE: &str = "CORS preflight request successful";
const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred";

/// Incoming request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    #[serde(default)]
    pub http_method: String,
    /// JSON text; absent or empty counts as `{}`
    #[serde(default)]
    pub body: Option<String>,
}

impl ApiRequest {
    #[must_use]
    pub fn post(body: impl Into<String>) -> Self {
        Self {
            http_method: "POST".to_string(),
            body: Some(body.into()),
        }
    }

    #[must_use]
    pub fn preflight() -> Self {
        Self {
            http_method: "OPTIONS".to_string(),
            body: None,
        }
    }

    /// Exactly `OPTIONS`; other spellings are handled as submissions
    #[inline]
    #[must_use]
    pub fn is_preflight(&self) -> bool {
        self.http_method == "OPTIONS"
    }
}

/// Outgoing response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// JSON text
    pub body: String,
}

impl ApiResponse {
    /// Response with the CORS headers and a JSON body
    #[must_use]
    pub fn json(status_code: u16, body: &Value) -> Self {
        let headers = CORS_HEADERS
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect();
        Self {
            status_code,
            headers,
            body: body.to_string(),
        }
    }

    /// Decode the body back into JSON
    ///
    /// # Errors
    /// If the body is not valid JSON
    pub fn body_json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}

/// A request handler
#[async_trait]
pub trait Handler: Send + Sync {
    /// Short name used in logs
    fn operation(&self) -> &'static str;

    /// 500 body text for storage failures
    fn storage_failure_message(&self) -> &'static str;

    /// Process a submission and return the success body
    ///
    /// # Errors
    /// Any `HandlerError`; `handle` turns it into a response
    async fn submit(&self, body: Option<&str>) -> Result<Value, HandlerError>;

    /// Answer one request
    async fn handle(&self, request: &ApiRequest) -> ApiResponse {
        if request.is_preflight() {
            return ApiResponse::json(200, &json!({ "message": PREFLIGHT_MESSAGE }));
        }

        let outcome = AssertUnwindSafe(self.submit(request.body.as_deref()))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(HandlerError::Unexpected(panic_text(&*panic))));

        match outcome {
            Ok(body) => ApiResponse::json(200, &body),
            Err(err) => error_response(self.operation(), self.storage_failure_message(), &err),
        }
    }
}

/// Map a handler error onto its response, logging server-side faults
fn error_response(operation: &str, storage_message: &str, err: &HandlerError) -> ApiResponse {
    let body = match err {
        HandlerError::Validation(e) => {
            tracing::info!(operation, error = %e, "submission rejected");
            json!({ "error": e.to_string() })
        }
        HandlerError::Conflict(c) => {
            let mut body = serde_json::Map::new();
            body.insert(c.body_field().to_string(), Value::from(c.message));
            Value::Object(body)
        }
        HandlerError::Storage(e) => {
            tracing::error!(operation, error = ?e, "storage failure");
            json!({ "error": storage_message })
        }
        HandlerError::Unexpected(detail) => {
            tracing::error!(operation, error = %detail, "unexpected failure");
            json!({ "error": UNEXPECTED_MESSAGE })
        }
    };
    ApiResponse::json(err.status_code(), &body)
}

fn panic_text(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "handler panicked".to_string())
}

/// Decode a request body into a draft
///
/// Absent or blank bodies decode as `{}`. Anything that is not a JSON
/// object, or whose known fields have the wrong type, is rejected.
///
/// # Errors
/// `ValidationError::MalformedBody`
pub fn parse_body<T: DeserializeOwned>(body: Option<&str>) -> Result<T, ValidationError> {
    let text = body.map(str::trim).filter(|t| !t.is_empty()).unwrap_or("{}");
    let value: Value = serde_json::from_str(text).map_err(|e| {
        tracing::debug!(error = %e, "body is not JSON");
        ValidationError::MalformedBody
    })?;
    if !value.is_object() {
        return Err(ValidationError::MalformedBody);
    }
    serde_json::from_value(value).map_err(|e| {
        tracing::debug!(error = %e, "body does not match the expected shape");
        ValidationError::MalformedBody
    })
}

/// The three handlers sharing one set of services
#[derive(Debug, Clone)]
pub struct Handlers {
    pub events: EventHandler,
    pub registrations: RegistrationHandler,
    pub subscriptions: SubscriptionHandler,
}

impl Handlers {
    #[must_use]
    pub fn new(services: Arc<Services>) -> Self {
        Self {
            events: EventHandler::new(Arc::clone(&services)),
            registrations: RegistrationHandler::new(Arc::clone(&services)),
            subscriptions: SubscriptionHandler::new(services),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulletin_model::SubscriberDraft;
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct Panics;

    #[async_trait]
    impl Handler for Panics {
        fn operation(&self) -> &'static str {
            "panics"
        }

        fn storage_failure_message(&self) -> &'static str {
            "Failed to process panics"
        }

        async fn submit(&self, _body: Option<&str>) -> Result<Value, HandlerError> {
            panic!("boom");
        }
    }

    #[derive(Debug)]
    struct Echo;

    #[async_trait]
    impl Handler for Echo {
        fn operation(&self) -> &'static str {
            "echo"
        }

        fn storage_failure_message(&self) -> &'static str {
            "Failed to process echo"
        }

        async fn submit(&self, body: Option<&str>) -> Result<Value, HandlerError> {
            let draft: SubscriberDraft = parse_body(body)?;
            Ok(json!({ "email": draft.email }))
        }
    }

    #[tokio::test]
    async fn preflight_short_circuits() {
        let response = Panics.handle(&ApiRequest::preflight()).await;
        assert_eq!(response.status_code, 200);
        assert_eq!(
            response.body_json().unwrap(),
            json!({ "message": "CORS preflight request successful" })
        );
        assert_eq!(response.headers["Access-Control-Allow-Methods"], "POST, OPTIONS");
    }

    #[tokio::test]
    async fn panic_becomes_generic_500() {
        let response = Panics.handle(&ApiRequest::post("{}")).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(
            response.body_json().unwrap(),
            json!({ "error": "An unexpected error occurred" })
        );
        assert_eq!(response.headers.len(), 3);
    }

    #[tokio::test]
    async fn non_options_methods_are_processed() {
        let request = ApiRequest {
            http_method: "PUT".into(),
            body: Some(r#"{"email":"a@b.com"}"#.into()),
        };
        let response = Echo.handle(&request).await;
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body_json().unwrap(), json!({ "email": "a@b.com" }));
    }

    #[test]
    fn parse_body_accepts_missing_and_blank() {
        let draft: SubscriberDraft = parse_body(None).unwrap();
        assert_eq!(draft, SubscriberDraft::default());
        let draft: SubscriberDraft = parse_body(Some("  ")).unwrap();
        assert_eq!(draft, SubscriberDraft::default());
    }

    #[test]
    fn parse_body_rejects_non_objects() {
        for body in ["not json", "[\"a@b.com\"]", "42", r#"{"email": 7}"#] {
            let err = parse_body::<SubscriberDraft>(Some(body)).unwrap_err();
            assert_eq!(err, ValidationError::MalformedBody, "body: {body}");
        }
    }

    #[test]
    fn request_decodes_gateway_shape() {
        let request: ApiRequest =
            serde_json::from_str(r#"{"httpMethod":"OPTIONS","body":null}"#).unwrap();
        assert!(request.is_preflight());
        assert_eq!(request.body, None);
    }

    #[tokio::test]
    async fn lowercase_options_is_a_submission() {
        let request = ApiRequest {
            http_method: "options".into(),
            body: None,
        };
        assert!(!request.is_preflight());
        let response = Echo.handle(&request).await;
        assert_eq!(response.body_json().unwrap(), json!({ "email": null }));
    }
}
