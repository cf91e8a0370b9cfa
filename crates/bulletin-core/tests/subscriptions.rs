mod common;

use bulletin_model::{Subscriber, SubscriberStatus};
use bulletin_store::Collection;
use bulletin_test_utils::{subscriber_record, subscription_body, RecordingMailer, RecordingTopic};
use common::{post, Harness};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn subscribing_twice_conflicts() {
    let h = Harness::new();
    let body = subscription_body("user@example.com");

    let (status, first) = post(&h.handlers.subscriptions, &body).await;
    assert_eq!(status, 200);
    assert_eq!(first["message"], "Successfully subscribed to our newsletter!");

    let (status, second) = post(&h.handlers.subscriptions, &body).await;
    assert_eq!(status, 409);
    assert_eq!(second, json!({ "message": "You are already subscribed to our newsletter" }));

    let stored: Vec<Subscriber> = h.load(Collection::Subscribers).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status, SubscriberStatus::Confirmed);
    assert_eq!(first["subscriberId"], stored[0].id.as_str());
    assert_eq!(h.topic.subscribed(), vec!["user@example.com"]);
}

#[tokio::test]
async fn topic_failure_does_not_fail_subscription() {
    let h = Harness::with_transports(RecordingTopic::failing(), RecordingMailer::new());
    let (status, _) = post(&h.handlers.subscriptions, &subscription_body("user@example.com")).await;
    assert_eq!(status, 200);

    let stored: Vec<Subscriber> = h.load(Collection::Subscribers).await;
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let h = Harness::new();
    for (body, message) in [
        ("{}", "Email is required"),
        (r#"{"email":""}"#, "Email is required"),
        (r#"{"email":"not-an-email"}"#, "Invalid email format"),
    ] {
        let (status, response) = post(&h.handlers.subscriptions, body).await;
        assert_eq!(status, 400);
        assert_eq!(response["error"], message);
    }
    assert!(h.topic.subscribed().is_empty());
    assert!(h.raw(Collection::Subscribers).is_none());
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let h = Harness::new();
    let (status, response) = post(&h.handlers.subscriptions, "{email:").await;
    assert_eq!(status, 400);
    assert_eq!(response["error"], "Invalid request body");
}

#[tokio::test]
async fn unknown_stored_status_does_not_break_subscribing() {
    let h = Harness::new();
    h.seed(
        Collection::Subscribers,
        &json!([subscriber_record("sub-2", "old@campus.edu", "bounced")]),
    );

    let (status, _) = post(&h.handlers.subscriptions, &subscription_body("new@campus.edu")).await;
    assert_eq!(status, 200);

    let stored: Vec<serde_json::Value> = h.load(Collection::Subscribers).await;
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0]["status"], "bounced");
    assert_eq!(stored[1]["status"], "confirmed");
}
