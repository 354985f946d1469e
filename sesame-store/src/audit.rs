//! Audit store: append-only persistence of normalized event records.

use std::path::PathBuf;

use async_trait::async_trait;
use dashmap::DashMap;
use sesame_event::NormalizedEventRecord;
use tracing::trace;

use crate::validate_filename_component;

/// Write-side interface to the audit store.
///
/// The pipeline never reads records back; rows live until the store expires
/// them via the record's own `expiration` attribute.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Persist one record. Every call appends a new row keyed by the
    /// record's fresh `id`, so redelivered notifications produce distinct
    /// rows.
    async fn record(&self, record: &NormalizedEventRecord) -> crate::Result<()>;
}

/// In-memory audit store.
///
/// Primarily a test double, in the same role the memory spool backend plays
/// for an MTA: assertions read the rows back through [`Self::records`].
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditStore {
    rows: std::sync::Arc<DashMap<String, NormalizedEventRecord>>,
}

impl MemoryAuditStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Snapshot of every persisted row, in no particular order.
    #[must_use]
    pub fn records(&self) -> Vec<NormalizedEventRecord> {
        self.rows.iter().map(|row| row.value().clone()).collect()
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn record(&self, record: &NormalizedEventRecord) -> crate::Result<()> {
        self.rows.insert(record.id.clone(), record.clone());
        Ok(())
    }
}

/// File-backed audit store: one JSON document per row under the table
/// directory, named by the record id.
#[derive(Debug, Clone)]
pub struct FileAuditStore {
    dir: PathBuf,
}

impl FileAuditStore {
    /// Open the store, creating the table directory if needed.
    ///
    /// # Errors
    /// Fails when the directory cannot be created.
    pub fn open(dir: PathBuf) -> crate::Result<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The directory rows are written to.
    #[must_use]
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

#[async_trait]
impl AuditStore for FileAuditStore {
    async fn record(&self, record: &NormalizedEventRecord) -> crate::Result<()> {
        let name = validate_filename_component(&record.id)?;
        let path = self.dir.join(format!("{name}.json"));
        let body = serde_json::to_vec(record)?;

        tokio::fs::write(&path, body).await?;
        trace!(path = %path.display(), "audit record written");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use sesame_event::{DEFAULT_TTL_MINUTES, DeliveryEvent};

    use super::*;

    fn record() -> NormalizedEventRecord {
        let body = json!({
            "eventType": "Bounce",
            "mail": {"messageId": "0100-abc"},
            "bounce": {"timestamp": "2025-03-20T14:51:11.257Z"}
        });
        let event = DeliveryEvent::from_body(&body.to_string()).unwrap();
        NormalizedEventRecord::from_event(&event, DEFAULT_TTL_MINUTES).unwrap()
    }

    #[tokio::test]
    async fn memory_store_appends_distinct_rows_per_redelivery() {
        let store = MemoryAuditStore::new();

        // Same provider notification ingested twice: two rows, same messageId.
        store.record(&record()).await.unwrap();
        store.record(&record()).await.unwrap();

        assert_eq!(store.len(), 2);
        assert!(store
            .records()
            .iter()
            .all(|row| row.message_id == "0100-abc"));
    }

    #[tokio::test]
    async fn file_store_writes_one_document_per_row() {
        let dir = std::env::temp_dir().join(format!("sesame-audit-{}", ulid::Ulid::new()));
        let store = FileAuditStore::open(dir.clone()).unwrap();

        let row = record();
        store.record(&row).await.unwrap();

        let written = std::fs::read_to_string(dir.join(format!("{}.json", row.id))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value.get("messageId"), Some(&json!("0100-abc")));
        assert_eq!(value.get("status"), Some(&json!("queued")));

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn file_store_rejects_traversal_ids() {
        let dir = std::env::temp_dir().join(format!("sesame-audit-{}", ulid::Ulid::new()));
        let store = FileAuditStore::open(dir.clone()).unwrap();

        let mut row = record();
        row.id = "../escape".to_string();
        assert!(matches!(
            store.record(&row).await,
            Err(crate::StoreError::InvalidKey(_))
        ));

        std::fs::remove_dir_all(dir).ok();
    }
}
