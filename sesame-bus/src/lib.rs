//! Outbound event-bus interface for derived notifications.
//!
//! The pipeline publishes suppression notifications for downstream consumers,
//! but publication is strictly best-effort: the bus being down must never
//! block the durable stores. The trait keeps the channel substitutable — the
//! hosting process wires the real transport, local runs log, tests capture.

use async_trait::async_trait;
use serde_json::Value;

mod bus;
mod config;
mod error;

pub use bus::{FailingEventBus, LogEventBus, MemoryEventBus, PublishedMessage};
pub use config::BusConfig;
pub use error::PublishError;

/// Outbound notification channel.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish one message under `category`.
    ///
    /// The category is normalized to lower case before it leaves the
    /// process.
    ///
    /// # Errors
    /// Returns [`PublishError`] when the bus does not accept the message;
    /// callers decide whether that is fatal.
    async fn publish(&self, category: &str, payload: &Value) -> Result<(), PublishError>;
}
