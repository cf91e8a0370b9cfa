//! Multi-channel announcement fan-out
//!
//! Sends happen one after another on the caller's task. Nothing is retried
//! or queued; the report only says what was attempted.

use crate::channel::{Mailer, OutgoingEmail, Topic};
use crate::message::EventNotice;
use bulletin_model::{Event, Subscriber};
use bulletin_store::{Collection, DocumentStore};
use std::sync::Arc;

/// Result of the broadcast channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastOutcome {
    /// No topic configured
    Disabled,
    Published,
    Failed(String),
}

/// Per-recipient result on the direct channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientOutcome {
    pub email: String,
    /// Transport error text, `None` when the send call succeeded
    pub error: Option<String>,
}

impl RecipientOutcome {
    #[inline]
    #[must_use]
    pub fn delivered(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of the direct channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectOutcome {
    /// No sender identity configured
    Disabled,
    /// Subscriber list could not be read; no sends attempted
    Unavailable(String),
    /// Sends attempted for every confirmed subscriber; empty when there were none
    Attempted(Vec<RecipientOutcome>),
}

/// What the fan-out attempted on each channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanoutReport {
    pub broadcast: BroadcastOutcome,
    pub direct: DirectOutcome,
}

impl FanoutReport {
    /// Whether either channel got as far as sending
    ///
    /// True after a successful publish, or once the direct channel made at
    /// least one send call, even if that recipient failed. A direct channel
    /// with no confirmed subscribers sent nothing.
    #[must_use]
    pub fn notification_sent(&self) -> bool {
        matches!(self.broadcast, BroadcastOutcome::Published)
            || matches!(&self.direct, DirectOutcome::Attempted(outcomes) if !outcomes.is_empty())
    }

    /// Recipients whose send call succeeded
    #[must_use]
    pub fn delivered_count(&self) -> usize {
        match &self.direct {
            DirectOutcome::Attempted(outcomes) => outcomes.iter().filter(|o| o.delivered()).count(),
            _ => 0,
        }
    }

    /// Recipients whose send call failed
    #[must_use]
    pub fn failed_count(&self) -> usize {
        match &self.direct {
            DirectOutcome::Attempted(outcomes) => {
                outcomes.iter().filter(|o| !o.delivered()).count()
            }
            _ => 0,
        }
    }
}

#[derive(Debug, Clone)]
struct DirectChannel {
    mailer: Arc<dyn Mailer>,
    sender: String,
}

/// Announces new events on every configured channel
#[derive(Debug, Clone)]
pub struct NotificationFanout {
    store: DocumentStore,
    topic: Option<Arc<dyn Topic>>,
    direct: Option<DirectChannel>,
}

impl NotificationFanout {
    /// Fan-out with both channels disabled
    #[inline]
    #[must_use]
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            topic: None,
            direct: None,
        }
    }

    /// Enable the broadcast channel
    #[inline]
    #[must_use]
    pub fn with_topic(mut self, topic: Arc<dyn Topic>) -> Self {
        self.topic = Some(topic);
        self
    }

    /// Enable the direct channel, sending as `sender`
    #[inline]
    #[must_use]
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>, sender: impl Into<String>) -> Self {
        self.direct = Some(DirectChannel {
            mailer,
            sender: sender.into(),
        });
        self
    }

    /// Announce `event` on every configured channel
    ///
    /// Never fails; every error is logged and folded into the report.
    pub async fn announce(&self, event: &Event) -> FanoutReport {
        let notice = EventNotice::compose(event);
        let broadcast = self.broadcast(&notice).await;
        let direct = self.direct(&notice).await;

        let report = FanoutReport { broadcast, direct };
        tracing::info!(
            event_id = %event.id,
            sent = report.notification_sent(),
            delivered = report.delivered_count(),
            failed = report.failed_count(),
            "event announcement finished"
        );
        report
    }

    async fn broadcast(&self, notice: &EventNotice) -> BroadcastOutcome {
        let Some(topic) = &self.topic else {
            return BroadcastOutcome::Disabled;
        };
        match topic.publish(&notice.subject, &notice.text).await {
            Ok(()) => {
                tracing::info!("notification published to topic");
                BroadcastOutcome::Published
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not publish to topic");
                BroadcastOutcome::Failed(e.to_string())
            }
        }
    }

    async fn direct(&self, notice: &EventNotice) -> DirectOutcome {
        let Some(channel) = &self.direct else {
            return DirectOutcome::Disabled;
        };

        let subscribers: Vec<Subscriber> = match self.store.load(Collection::Subscribers).await {
            Ok(subscribers) => subscribers,
            Err(e) => {
                tracing::warn!(error = %e, "could not load subscribers for direct notification");
                return DirectOutcome::Unavailable(e.to_string());
            }
        };

        let mut outcomes = Vec::new();
        for subscriber in subscribers.iter().filter(|s| s.is_confirmed()) {
            let email = OutgoingEmail {
                from: channel.sender.clone(),
                to: subscriber.email.clone(),
                subject: notice.subject.clone(),
                html: notice.html.clone(),
                text: notice.text.clone(),
            };
            let error = match channel.mailer.send(&email).await {
                Ok(()) => None,
                Err(e) => {
                    tracing::warn!(recipient = %subscriber.email, error = %e, "could not send email");
                    Some(e.to_string())
                }
            };
            outcomes.push(RecipientOutcome {
                email: subscriber.email.clone(),
                error,
            });
        }

        tracing::info!(
            subscribers = subscribers.len(),
            attempted = outcomes.len(),
            "direct notification loop finished"
        );
        DirectOutcome::Attempted(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{MockMailer, MockTopic};
    use crate::error::NotifyError;
    use bulletin_model::SubscriberStatus;
    use bulletin_store::{CollectionKeys, MemoryBlobStore};
    use pretty_assertions::assert_eq;

    fn event() -> Event {
        Event {
            id: "e1".into(),
            name: "Fall Fest".into(),
            date: "2025-09-10".into(),
            time: "5pm".into(),
            venue: "Quad".into(),
            description: "A".into(),
            created_at: "2025-08-01T00:00:00.000000Z".into(),
            extra: serde_json::Map::new(),
        }
    }

    fn subscriber(email: &str, status: SubscriberStatus) -> Subscriber {
        Subscriber {
            id: "sub-00000000".into(),
            email: email.into(),
            timestamp: "t".into(),
            status,
            extra: serde_json::Map::new(),
        }
    }

    async fn store_with(subscribers: &[Subscriber]) -> DocumentStore {
        let store = DocumentStore::new(
            Arc::new(MemoryBlobStore::new()),
            "campus",
            CollectionKeys::default(),
        );
        store.save(Collection::Subscribers, subscribers).await.unwrap();
        store
    }

    #[tokio::test]
    async fn no_channels_sends_nothing() {
        let fanout = NotificationFanout::new(store_with(&[]).await);
        let report = fanout.announce(&event()).await;
        assert_eq!(report.broadcast, BroadcastOutcome::Disabled);
        assert_eq!(report.direct, DirectOutcome::Disabled);
        assert!(!report.notification_sent());
    }

    #[tokio::test]
    async fn publishes_subject_and_text() {
        let mut topic = MockTopic::new();
        topic
            .expect_publish()
            .withf(|subject, message| {
                subject == "New Campus Event: Fall Fest" && message.contains("Description: A...")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let fanout = NotificationFanout::new(store_with(&[]).await).with_topic(Arc::new(topic));
        let report = fanout.announce(&event()).await;
        assert_eq!(report.broadcast, BroadcastOutcome::Published);
        assert!(report.notification_sent());
    }

    #[tokio::test]
    async fn topic_failure_does_not_block_direct() {
        let mut topic = MockTopic::new();
        topic
            .expect_publish()
            .returning(|_, _| Err(NotifyError::topic("campus-events", "throttled")));
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(1).returning(|_| Ok(()));

        let subs = [subscriber("a@x.com", SubscriberStatus::Confirmed)];
        let fanout = NotificationFanout::new(store_with(&subs).await)
            .with_topic(Arc::new(topic))
            .with_mailer(Arc::new(mailer), "events@campus.edu");
        let report = fanout.announce(&event()).await;

        assert!(matches!(report.broadcast, BroadcastOutcome::Failed(_)));
        assert_eq!(report.delivered_count(), 1);
        assert!(report.notification_sent());
    }

    #[tokio::test]
    async fn one_failed_recipient_does_not_stop_the_rest() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(3)
            .returning(|email| {
                if email.to == "b@x.com" {
                    Err(NotifyError::delivery(&email.to, "mailbox unavailable"))
                } else {
                    Ok(())
                }
            });

        let subs = [
            subscriber("a@x.com", SubscriberStatus::Confirmed),
            subscriber("b@x.com", SubscriberStatus::Confirmed),
            subscriber("c@x.com", SubscriberStatus::Confirmed),
        ];
        let fanout = NotificationFanout::new(store_with(&subs).await)
            .with_mailer(Arc::new(mailer), "events@campus.edu");
        let report = fanout.announce(&event()).await;

        assert_eq!(report.delivered_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert!(report.notification_sent());
        let DirectOutcome::Attempted(outcomes) = &report.direct else {
            panic!("expected attempted sends, got {:?}", report.direct);
        };
        let order: Vec<&str> = outcomes.iter().map(|o| o.email.as_str()).collect();
        assert_eq!(order, vec!["a@x.com", "b@x.com", "c@x.com"]);
    }

    #[tokio::test]
    async fn only_confirmed_subscribers_are_mailed() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|email| {
                email.to == "a@x.com"
                    && email.from == "events@campus.edu"
                    && email.subject == "New Campus Event: Fall Fest"
                    && email.html.contains("<h2>Fall Fest</h2>")
            })
            .times(1)
            .returning(|_| Ok(()));

        let subs = [
            subscriber("a@x.com", SubscriberStatus::Confirmed),
            subscriber("p@x.com", SubscriberStatus::Pending),
            subscriber("u@x.com", SubscriberStatus::Unsubscribed),
            subscriber("o@x.com", SubscriberStatus::Other("bounced".into())),
        ];
        let fanout = NotificationFanout::new(store_with(&subs).await)
            .with_mailer(Arc::new(mailer), "events@campus.edu");
        let report = fanout.announce(&event()).await;
        assert_eq!(report.delivered_count(), 1);
    }

    #[tokio::test]
    async fn direct_with_no_subscribers_is_not_sent() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();
        let fanout = NotificationFanout::new(store_with(&[]).await)
            .with_mailer(Arc::new(mailer), "events@campus.edu");
        let report = fanout.announce(&event()).await;
        assert_eq!(report.direct, DirectOutcome::Attempted(vec![]));
        assert!(!report.notification_sent());
    }

    #[tokio::test]
    async fn missing_subscriber_document_is_not_sent() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();
        let store = DocumentStore::new(
            Arc::new(MemoryBlobStore::new()),
            "campus",
            CollectionKeys::default(),
        );
        let fanout = NotificationFanout::new(store).with_mailer(Arc::new(mailer), "events@campus.edu");
        assert!(!fanout.announce(&event()).await.notification_sent());
    }

    #[tokio::test]
    async fn unreadable_subscribers_disable_direct() {
        let blobs = Arc::new(MemoryBlobStore::new());
        blobs.insert("campus", "subscribers.json", "oops");
        let store = DocumentStore::new(blobs, "campus", CollectionKeys::default());

        let mut mailer = MockMailer::new();
        mailer.expect_send().never();
        let fanout = NotificationFanout::new(store).with_mailer(Arc::new(mailer), "events@campus.edu");
        let report = fanout.announce(&event()).await;
        assert!(matches!(report.direct, DirectOutcome::Unavailable(_)));
        assert!(!report.notification_sent());
    }
}
