//! Typed error handling for batch ingestion.

use sesame_common::TimeError;
use sesame_event::EventError;
use sesame_store::StoreError;
use thiserror::Error;

/// Fatal ingestion failures.
///
/// Any of these aborts the remaining records in the batch and propagates to
/// the hosting trigger, whose redelivery policy is the recovery path. Publish
/// failures are deliberately absent: they are isolated per entry and surfaced
/// through [`crate::BatchSummary`] instead.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The record body could not be normalized into a delivery event.
    #[error("malformed event: {0}")]
    Malformed(#[from] EventError),

    /// The event timestamp could not be parsed while computing expiry.
    #[error("bad event timestamp: {0}")]
    Timestamp(#[from] TimeError),

    /// An audit- or suppression-store write failed.
    #[error("store write failed: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_the_fatal_error_kinds() {
        let err: IngestError = EventError::MissingEventType.into();
        assert!(matches!(err, IngestError::Malformed(_)));
        assert!(err.to_string().contains("eventType"));

        let err: IngestError = StoreError::InvalidKey("a/b".to_string()).into();
        assert!(matches!(err, IngestError::Store(_)));
    }
}
