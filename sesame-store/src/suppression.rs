//! Suppression store: at most one live entry per recipient address.

use std::path::PathBuf;

use async_trait::async_trait;
use dashmap::DashMap;
use sesame_event::SuppressionEntry;
use tracing::trace;

use crate::validate_filename_component;

/// Write-side interface to the suppression store.
///
/// Writes are unconditional upserts keyed by the recipient address, which is
/// what gives the pipeline its last-write-wins ordering guarantee: when the
/// same address appears twice in a batch, the later record's entry survives.
#[async_trait]
pub trait SuppressionStore: Send + Sync {
    /// Insert or overwrite the entry for `entry.email_address`.
    async fn put(&self, entry: &SuppressionEntry) -> crate::Result<()>;
}

/// In-memory suppression store, used by tests and local development.
#[derive(Debug, Clone, Default)]
pub struct MemorySuppressionStore {
    rows: std::sync::Arc<DashMap<String, SuppressionEntry>>,
}

impl MemorySuppressionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The live entry for `address`, if any.
    #[must_use]
    pub fn get(&self, address: &str) -> Option<SuppressionEntry> {
        self.rows.get(address).map(|row| row.value().clone())
    }

    /// Snapshot of every live entry, in no particular order.
    #[must_use]
    pub fn entries(&self) -> Vec<SuppressionEntry> {
        self.rows.iter().map(|row| row.value().clone()).collect()
    }
}

#[async_trait]
impl SuppressionStore for MemorySuppressionStore {
    async fn put(&self, entry: &SuppressionEntry) -> crate::Result<()> {
        self.rows.insert(entry.email_address.clone(), entry.clone());
        Ok(())
    }
}

/// File-backed suppression store: one JSON document per address under the
/// table directory. An address that cannot be used as a filename (path
/// separators, traversal patterns) is rejected rather than sanitized.
#[derive(Debug, Clone)]
pub struct FileSuppressionStore {
    dir: PathBuf,
}

impl FileSuppressionStore {
    /// Open the store, creating the table directory if needed.
    ///
    /// # Errors
    /// Fails when the directory cannot be created.
    pub fn open(dir: PathBuf) -> crate::Result<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The directory entries are written to.
    #[must_use]
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

#[async_trait]
impl SuppressionStore for FileSuppressionStore {
    async fn put(&self, entry: &SuppressionEntry) -> crate::Result<()> {
        let name = validate_filename_component(&entry.email_address)?;
        let path = self.dir.join(format!("{name}.json"));
        let body = serde_json::to_vec(entry)?;

        tokio::fs::write(&path, body).await?;
        trace!(path = %path.display(), "suppression entry written");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(address: &str, message: &str) -> SuppressionEntry {
        SuppressionEntry {
            id: address.to_string(),
            email_address: address.to_string(),
            timestamp: "2025-03-20T14:51:11.257Z".to_string(),
            kind: "Bounce".to_string(),
            stage: "produccion".to_string(),
            message: message.to_string(),
            message_id: "0100-abc".to_string(),
            company_id: "0".to_string(),
        }
    }

    #[tokio::test]
    async fn memory_store_overwrites_by_address() {
        let store = MemorySuppressionStore::new();

        store.put(&entry("a@x.com", "first")).await.unwrap();
        store.put(&entry("a@x.com", "second")).await.unwrap();
        store.put(&entry("b@y.com", "other")).await.unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a@x.com").unwrap().message, "second");
    }

    #[tokio::test]
    async fn file_store_overwrites_by_address() {
        let dir = std::env::temp_dir().join(format!("sesame-suppression-{}", ulid::Ulid::new()));
        let store = FileSuppressionStore::open(dir.clone()).unwrap();

        store.put(&entry("a@x.com", "first")).await.unwrap();
        store.put(&entry("a@x.com", "second")).await.unwrap();

        let files: Vec<_> = std::fs::read_dir(&dir).unwrap().collect();
        assert_eq!(files.len(), 1);

        let written = std::fs::read_to_string(dir.join("a@x.com.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value.get("message"), Some(&serde_json::json!("second")));

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn file_store_rejects_unsafe_addresses() {
        let dir = std::env::temp_dir().join(format!("sesame-suppression-{}", ulid::Ulid::new()));
        let store = FileSuppressionStore::open(dir.clone()).unwrap();

        assert!(matches!(
            store.put(&entry("../../etc/passwd", "")).await,
            Err(crate::StoreError::InvalidKey(_))
        ));

        std::fs::remove_dir_all(dir).ok();
    }
}
