//! Error types for event normalization.

use thiserror::Error;

/// Errors raised while decoding a delivery-event envelope.
///
/// Every variant is fatal for the record being processed: a payload this
/// pipeline cannot attribute to an event type has no safe interpretation, and
/// the hosting trigger's redelivery policy is the recovery mechanism.
#[derive(Debug, Error)]
pub enum EventError {
    /// The record body is not valid JSON.
    #[error("event body is not valid JSON: {0}")]
    Body(#[source] serde_json::Error),

    /// The `Message` wrapper carries a string that is not itself valid JSON.
    #[error("inner message payload is not valid JSON: {0}")]
    InnerMessage(#[source] serde_json::Error),

    /// The decoded payload is not a JSON object.
    #[error("event payload is not a JSON object")]
    NotAnObject,

    /// The payload has no usable `eventType` discriminator.
    #[error("event payload is missing the eventType discriminator")]
    MissingEventType,

    /// The payload's `mail` metadata is absent or malformed.
    #[error("malformed mail metadata: {0}")]
    Mail(#[source] serde_json::Error),
}
