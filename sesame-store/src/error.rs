//! Error types for the sesame-store crate.

use std::io;

use thiserror::Error;

/// Errors raised by audit- and suppression-store backends.
///
/// Store writes are fatal for the record being ingested: the durable trail is
/// the whole point of the pipeline, so callers propagate these rather than
/// papering over them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O failure in a file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Row serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The key cannot be used as a storage identifier.
    #[error("invalid store key {0:?}")]
    InvalidKey(String),
}

/// Specialized `Result` type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
