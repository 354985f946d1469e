//! Transport-envelope unwrapping and event normalization.
//!
//! Provider notifications arrive as an opaque body string which may be
//! double-wrapped: an outer transport object whose `Message` field carries a
//! further serialized payload. [`DeliveryEvent::from_body`] unwraps either
//! form and extracts the discriminator, the mail metadata, and the
//! type-specific detail object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EventError;

/// Classified event discriminator.
///
/// Only the three suppression-relevant classes are distinguished; everything
/// else (Delivery, Open, Click, Send, ...) is audited but produces no
/// suppression entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Bounce,
    Reject,
    Complaint,
    Other(String),
}

impl From<&str> for EventKind {
    fn from(value: &str) -> Self {
        match value {
            "Bounce" => Self::Bounce,
            "Reject" => Self::Reject,
            "Complaint" => Self::Complaint,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Mail metadata attached to every provider notification.
///
/// Only the fields this pipeline acts on are typed. Whatever else the
/// provider includes (source, headers, commonHeaders, ...) lands in `extra`
/// so the audit record preserves the object as delivered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailMetadata {
    /// Provider-assigned message identifier.
    pub message_id: String,

    /// Every recipient address of the original send.
    #[serde(default)]
    pub destination: Vec<String>,

    /// Free-form tag name to list-of-values metadata. Kept loose on purpose:
    /// malformed tag data must degrade to attribution defaults, never fail
    /// decoding.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub tags: Value,

    /// Remaining provider fields, carried through to the audit record.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A normalized delivery-outcome notification.
#[derive(Debug, Clone)]
pub struct DeliveryEvent {
    /// Classified discriminator.
    pub kind: EventKind,
    /// The raw `eventType` string as the provider sent it.
    pub event_type: String,
    /// Mail metadata of the original send.
    pub mail: MailMetadata,
    /// Type-specific payload, looked up at the lower-cased `eventType` key.
    pub detail: Value,
    /// `detail.timestamp` when present, otherwise the ingestion wall-clock
    /// time in RFC 3339.
    pub timestamp: String,
}

impl DeliveryEvent {
    /// Decode a raw record body into a normalized event.
    ///
    /// # Errors
    /// Fails when the body (or an inner `Message` string) is not valid JSON,
    /// when the payload is not an object, when `eventType` is missing, or
    /// when the `mail` metadata cannot be decoded. All of these abort the
    /// record.
    pub fn from_body(body: &str) -> Result<Self, EventError> {
        let outer: Value = serde_json::from_str(body).map_err(EventError::Body)?;
        let Value::Object(payload) = unwrap_message(outer)? else {
            return Err(EventError::NotAnObject);
        };

        let event_type = payload
            .get("eventType")
            .and_then(Value::as_str)
            .ok_or(EventError::MissingEventType)?
            .to_string();

        let mail: MailMetadata =
            serde_json::from_value(payload.get("mail").cloned().unwrap_or(Value::Null))
                .map_err(EventError::Mail)?;

        let detail = payload
            .get(&event_type.to_lowercase())
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));

        let timestamp = detail
            .get("timestamp")
            .and_then(Value::as_str)
            .map_or_else(sesame_common::time::now_iso, ToString::to_string);

        Ok(Self {
            kind: EventKind::from(event_type.as_str()),
            event_type,
            mail,
            detail,
            timestamp,
        })
    }
}

/// Peel the transport layer: a `Message` field holding a serialized payload
/// string is decoded, a `Message` field holding an object is used directly,
/// and with no `Message` field the outer object is already the payload.
fn unwrap_message(outer: Value) -> Result<Value, EventError> {
    let Value::Object(mut object) = outer else {
        return Err(EventError::NotAnObject);
    };

    match object.remove("Message") {
        Some(Value::String(inner)) => {
            serde_json::from_str(&inner).map_err(EventError::InnerMessage)
        }
        Some(inner) => Ok(inner),
        None => Ok(Value::Object(object)),
    }
}
