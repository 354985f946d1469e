//! Event-bus backends.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::{EventBus, PublishError};

/// Bus backend that emits each message as a structured log event.
///
/// This is the local-run sink: the message is visible in the process output
/// and nothing leaves the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventBus;

impl LogEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventBus for LogEventBus {
    async fn publish(&self, category: &str, payload: &Value) -> Result<(), PublishError> {
        info!(category = %category.to_lowercase(), payload = %payload, "event published");
        Ok(())
    }
}

/// One captured message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub category: String,
    pub payload: Value,
}

/// Bus backend that captures messages in memory for assertions.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventBus {
    messages: Arc<Mutex<Vec<PublishedMessage>>>,
}

impl MemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of captured messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every captured message, in publish order.
    #[must_use]
    pub fn published(&self) -> Vec<PublishedMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl EventBus for MemoryEventBus {
    async fn publish(&self, category: &str, payload: &Value) -> Result<(), PublishError> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(PublishedMessage {
                category: category.to_lowercase(),
                payload: payload.clone(),
            });
        Ok(())
    }
}

/// Bus backend that refuses every message.
///
/// Exists to exercise publish-failure isolation in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingEventBus;

impl FailingEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventBus for FailingEventBus {
    async fn publish(&self, _category: &str, _payload: &Value) -> Result<(), PublishError> {
        Err(PublishError::Rejected("bus unavailable".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn memory_bus_captures_in_publish_order() {
        let bus = MemoryEventBus::new();

        bus.publish("email-suppression", &json!({"emailAddress": "a@x.com"}))
            .await
            .unwrap();
        bus.publish("email-suppression", &json!({"emailAddress": "b@y.com"}))
            .await
            .unwrap();

        let published = bus.published();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].payload, json!({"emailAddress": "a@x.com"}));
        assert_eq!(published[1].payload, json!({"emailAddress": "b@y.com"}));
    }

    #[tokio::test]
    async fn categories_are_lower_cased() {
        let bus = MemoryEventBus::new();
        bus.publish("Email-Suppression", &json!({})).await.unwrap();

        assert_eq!(bus.published()[0].category, "email-suppression");
    }

    #[tokio::test]
    async fn failing_bus_always_rejects() {
        let bus = FailingEventBus::new();
        assert!(bus.publish("email-suppression", &json!({})).await.is_err());
    }
}
