//! Error types for the sesame-bus crate.

use thiserror::Error;

/// Errors raised while publishing to the event bus.
///
/// Publish failures are isolated by callers: a notification channel outage
/// is logged and surfaced as a value, never allowed to fail the record whose
/// stores were already written.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The bus rejected or failed to accept the message.
    #[error("publish failed: {0}")]
    Rejected(String),
}
