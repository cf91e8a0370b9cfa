//! Shared dependencies handed to every handler

use crate::config::BulletinConfig;
use crate::pipeline::AppendPipeline;
use bulletin_model::RecordFactory;
use bulletin_notify::{Mailer, NotificationFanout, Topic};
use bulletin_store::{BlobStore, DocumentStore};
use std::sync::Arc;

/// Notification transports available to the process
///
/// A transport is only used when the configuration also names its
/// destination.
#[derive(Debug, Clone, Default)]
pub struct Transports {
    pub topic: Option<Arc<dyn Topic>>,
    pub mailer: Option<Arc<dyn Mailer>>,
}

impl Transports {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_topic(mut self, topic: Arc<dyn Topic>) -> Self {
        self.topic = Some(topic);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }
}

/// Store, clock and notification channels
#[derive(Debug, Clone)]
pub struct Services {
    store: DocumentStore,
    factory: RecordFactory,
    topic: Option<Arc<dyn Topic>>,
    fanout: NotificationFanout,
}

impl Services {
    /// Services with notifications disabled
    #[must_use]
    pub fn new(store: DocumentStore) -> Self {
        Self {
            fanout: NotificationFanout::new(store.clone()),
            store,
            factory: RecordFactory::new(),
            topic: None,
        }
    }

    /// Wire services from configuration
    ///
    /// The broadcast channel is enabled only when both a topic transport and
    /// `config.topic` are present; the direct channel likewise needs a mailer
    /// and `config.sender`.
    #[must_use]
    pub fn from_config(
        config: &BulletinConfig,
        blobs: Arc<dyn BlobStore>,
        transports: Transports,
    ) -> Self {
        let store = DocumentStore::new(blobs, config.bucket.clone(), config.keys.clone());
        let mut services = Self::new(store);

        match (transports.topic, config.topic.as_deref()) {
            (Some(topic), Some(destination)) => {
                tracing::debug!(destination, "broadcast channel enabled");
                services = services.with_topic(topic);
            }
            _ => tracing::debug!("broadcast channel disabled"),
        }
        match (transports.mailer, config.sender.as_deref()) {
            (Some(mailer), Some(sender)) => {
                tracing::debug!(sender, "direct channel enabled");
                services = services.with_mailer(mailer, sender);
            }
            _ => tracing::debug!("direct channel disabled"),
        }
        services
    }

    /// Enable the broadcast channel, also used for newsletter sign-ups
    #[must_use]
    pub fn with_topic(mut self, topic: Arc<dyn Topic>) -> Self {
        self.fanout = self.fanout.with_topic(Arc::clone(&topic));
        self.topic = Some(topic);
        self
    }

    /// Enable the direct channel
    #[must_use]
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>, sender: impl Into<String>) -> Self {
        self.fanout = self.fanout.with_mailer(mailer, sender);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_factory(mut self, factory: RecordFactory) -> Self {
        self.factory = factory;
        self
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    #[inline]
    #[must_use]
    pub fn topic(&self) -> Option<&Arc<dyn Topic>> {
        self.topic.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn fanout(&self) -> &NotificationFanout {
        &self.fanout
    }

    #[inline]
    #[must_use]
    pub fn pipeline(&self) -> AppendPipeline<'_> {
        AppendPipeline::new(&self.store, &self.factory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulletin_notify::{LogMailer, LogTopic};
    use bulletin_store::MemoryBlobStore;

    #[test]
    fn channels_need_config_and_transport() {
        let transports = Transports::new()
            .with_topic(Arc::new(LogTopic::new("t")))
            .with_mailer(Arc::new(LogMailer));
        let config = BulletinConfig::new().with_bucket("campus");

        let services =
            Services::from_config(&config, Arc::new(MemoryBlobStore::new()), transports.clone());
        assert!(services.topic().is_none());

        let config = config.with_topic("arn:events");
        let services = Services::from_config(&config, Arc::new(MemoryBlobStore::new()), transports);
        assert!(services.topic().is_some());
        assert_eq!(services.store().bucket(), "campus");
    }

    #[test]
    fn topic_without_transport_stays_disabled() {
        let config = BulletinConfig::new().with_topic("arn:events");
        let services =
            Services::from_config(&config, Arc::new(MemoryBlobStore::new()), Transports::new());
        assert!(services.topic().is_none());
    }
}
