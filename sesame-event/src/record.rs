//! The durable audit record persisted for every ingested event.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sesame_common::time::{self, TimeError};

use crate::envelope::{DeliveryEvent, MailMetadata};

/// Default record retention window: 525 600 minutes, a 365-day year.
pub const DEFAULT_TTL_MINUTES: i64 = 525_600;

/// Audit-store row for one ingested delivery event.
///
/// `id` is a fresh ULID, independent of the provider's `messageId`:
/// redelivering the same notification produces a second, distinct record.
/// The store expires rows on its own once `expiration` (epoch seconds) has
/// passed; this pipeline never mutates or deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEventRecord {
    pub id: String,
    pub message_id: String,
    pub status: String,
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub detail: Value,
    pub expiration: i64,
    pub mail: MailMetadata,
}

impl NormalizedEventRecord {
    /// Build the audit record for `event`, expiring `ttl_minutes` after the
    /// event timestamp.
    ///
    /// # Errors
    /// Fails when the event timestamp cannot be parsed.
    pub fn from_event(event: &DeliveryEvent, ttl_minutes: i64) -> Result<Self, TimeError> {
        let expiration = time::epoch_seconds(time::add_minutes(&event.timestamp, ttl_minutes)?);

        Ok(Self {
            id: ulid::Ulid::new().to_string(),
            message_id: event.mail.message_id.clone(),
            status: "queued".to_string(),
            timestamp: event.timestamp.clone(),
            kind: event.event_type.clone(),
            detail: event.detail.clone(),
            expiration,
            mail: event.mail.clone(),
        })
    }
}
