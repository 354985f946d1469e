//! Runtime selection of store backends.

use std::{path::PathBuf, sync::Arc};

use serde::Deserialize;

use crate::{
    audit::{AuditStore, FileAuditStore, MemoryAuditStore},
    suppression::{FileSuppressionStore, MemorySuppressionStore, SuppressionStore},
};

/// Backend selection for both stores.
///
/// File-backed stores in TOML config:
/// ```toml
/// [store]
/// type = "file"
/// root = "/var/lib/sesame"
/// ```
///
/// Memory-backed stores (the default, for development and tests):
/// ```toml
/// [store]
/// type = "memory"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// One directory per table under `root`.
    File {
        root: PathBuf,
        /// Table name for audit records.
        #[serde(default = "default_audit_table")]
        audit_table: String,
        /// Table name for suppression entries.
        #[serde(default = "default_suppression_table")]
        suppression_table: String,
    },
    /// Transient in-process stores.
    Memory,
}

fn default_audit_table() -> String {
    "ses-event".to_string()
}

fn default_suppression_table() -> String {
    "ses-email-suppression".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Memory
    }
}

impl StoreConfig {
    /// Construct both stores from this configuration.
    ///
    /// The handles are built once at process start and shared; components
    /// receive them as explicit dependencies rather than reaching for
    /// process-wide state.
    ///
    /// # Errors
    /// Fails when a file root cannot be created.
    pub fn into_stores(self) -> crate::Result<(Arc<dyn AuditStore>, Arc<dyn SuppressionStore>)> {
        match self {
            Self::File {
                root,
                audit_table,
                suppression_table,
            } => Ok((
                Arc::new(FileAuditStore::open(root.join(audit_table))?),
                Arc::new(FileSuppressionStore::open(root.join(suppression_table))?),
            )),
            Self::Memory => Ok((
                Arc::new(MemoryAuditStore::new()),
                Arc::new(MemorySuppressionStore::new()),
            )),
        }
    }
}
