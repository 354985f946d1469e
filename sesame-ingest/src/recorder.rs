//! Construction and persistence of audit records.

use std::sync::Arc;

use sesame_event::{DeliveryEvent, NormalizedEventRecord};
use sesame_store::AuditStore;
use tracing::debug;

use crate::error::IngestError;

/// Builds the durable audit record for each event and writes it through the
/// audit store.
pub struct EventRecorder {
    store: Arc<dyn AuditStore>,
    ttl_minutes: i64,
}

impl std::fmt::Debug for EventRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRecorder")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish_non_exhaustive()
    }
}

impl EventRecorder {
    #[must_use]
    pub fn new(store: Arc<dyn AuditStore>, ttl_minutes: i64) -> Self {
        Self { store, ttl_minutes }
    }

    /// Build the audit record for `event` and persist it.
    ///
    /// # Errors
    /// Propagates timestamp-parse and store-write failures; both are fatal
    /// for the record being ingested.
    pub async fn record(
        &self,
        event: &DeliveryEvent,
    ) -> Result<NormalizedEventRecord, IngestError> {
        let record = NormalizedEventRecord::from_event(event, self.ttl_minutes)?;
        self.store.record(&record).await?;

        debug!(
            id = %record.id,
            message_id = %record.message_id,
            kind = %record.kind,
            expiration = record.expiration,
            "audit record persisted"
        );

        Ok(record)
    }
}
