//! Batch ingestion pipeline for delivery-outcome notifications.
//!
//! Orchestrates the pure domain core over the store and bus interfaces: each
//! incoming record is normalized, attributed, audited, classified, and its
//! suppression entries persisted and announced — strictly in order, one
//! suspension point at a time. The first unrecovered failure aborts the
//! batch; the hosting trigger redelivers.

pub mod config;
pub mod error;
pub mod processor;
pub mod publisher;
pub mod recorder;

pub use config::IngestConfig;
pub use error::IngestError;
pub use processor::{Batch, BatchIngestor, BatchSummary, QueueRecord};
pub use publisher::{PublishOutcome, SUPPRESSION_CATEGORY, SuppressionPublisher};
pub use recorder::EventRecorder;
