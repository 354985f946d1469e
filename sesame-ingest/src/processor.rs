//! Batch orchestration over incoming queue records.

use std::sync::Arc;

use serde::Deserialize;
use sesame_bus::EventBus;
use sesame_event::{Attribution, DeliveryEvent, classify};
use sesame_store::{AuditStore, SuppressionStore};
use tracing::info;

use crate::{
    config::IngestConfig, error::IngestError, publisher::SuppressionPublisher,
    recorder::EventRecorder,
};

/// One opaque record delivered by the queue trigger.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueRecord {
    /// Raw notification body.
    pub body: String,
}

impl QueueRecord {
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

/// A delivered batch, in the provider's `{"Records": [...]}` shape.
#[derive(Debug, Clone, Deserialize)]
pub struct Batch {
    #[serde(rename = "Records", default)]
    pub records: Vec<QueueRecord>,
}

/// Counters for a fully successful invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Records ingested.
    pub records: usize,
    /// Suppression entries persisted.
    pub suppressions: usize,
    /// Entries whose bus notification failed (they were persisted anyway).
    pub publish_failures: usize,
}

/// Sequential ingestion pipeline over delivery-event batches.
///
/// All store and bus handles are injected once at construction; the ingestor
/// itself holds no other state and can be invoked for any number of batches.
#[derive(Debug)]
pub struct BatchIngestor {
    recorder: EventRecorder,
    publisher: SuppressionPublisher,
}

impl BatchIngestor {
    #[must_use]
    pub fn new(
        audit: Arc<dyn AuditStore>,
        suppression: Arc<dyn SuppressionStore>,
        bus: Arc<dyn EventBus>,
        config: &IngestConfig,
    ) -> Self {
        Self {
            recorder: EventRecorder::new(audit, config.ttl_minutes),
            publisher: SuppressionPublisher::new(suppression, bus),
        }
    }

    /// Ingest every record, in batch order.
    ///
    /// The first unrecovered failure aborts the remaining records and
    /// propagates: the batch is all-or-nothing from the caller's view, and
    /// writes performed before the failure are not rolled back. Redelivery of
    /// the failed batch is the hosting trigger's responsibility.
    ///
    /// # Errors
    /// Returns the first [`IngestError`] encountered.
    pub async fn process_batch(
        &self,
        records: &[QueueRecord],
    ) -> Result<BatchSummary, IngestError> {
        let mut summary = BatchSummary::default();

        for record in records {
            let (suppressions, publish_failures) = self.process_record(record).await?;
            summary.records += 1;
            summary.suppressions += suppressions;
            summary.publish_failures += publish_failures;
        }

        info!(
            records = summary.records,
            suppressions = summary.suppressions,
            publish_failures = summary.publish_failures,
            "batch ingested"
        );

        Ok(summary)
    }

    /// Ingest one record: normalize, attribute, audit, classify, suppress.
    ///
    /// Suppression entries are applied in classifier order, one at a time,
    /// which is what makes the last write for a repeated address
    /// deterministic.
    async fn process_record(&self, record: &QueueRecord) -> Result<(usize, usize), IngestError> {
        let event = DeliveryEvent::from_body(&record.body)?;
        let attribution = Attribution::from_tags(&event.mail.tags);

        self.recorder.record(&event).await?;

        let entries = classify(&event, &attribution);
        let mut publish_failures = 0;
        for entry in &entries {
            let outcome = self.publisher.apply(entry).await?;
            if !outcome.published {
                publish_failures += 1;
            }
        }

        Ok((entries.len(), publish_failures))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn batch_decodes_the_provider_records_shape() {
        let batch: Batch = serde_json::from_str(
            r#"{"Records": [{"body": "{}", "messageId": "m-1", "eventSource": "aws:sqs"}]}"#,
        )
        .unwrap();

        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].body, "{}");
    }

    #[test]
    fn batch_tolerates_an_empty_container() {
        let batch: Batch = serde_json::from_str("{}").unwrap();
        assert!(batch.records.is_empty());
    }
}
