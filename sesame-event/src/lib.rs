//! Domain model for provider delivery-outcome notifications.
//!
//! Everything in this crate is pure: envelope unwrapping, tenant attribution,
//! audit-record construction and suppression classification all happen
//! without I/O, so the decision logic can be tested exhaustively without
//! stores or buses in the picture.

pub mod envelope;
pub mod error;
pub mod record;
pub mod suppression;
pub mod tags;

pub use envelope::{DeliveryEvent, EventKind, MailMetadata};
pub use error::EventError;
pub use record::{DEFAULT_TTL_MINUTES, NormalizedEventRecord};
pub use suppression::{OutboundSuppressionEvent, SuppressionEntry, classify};
pub use tags::Attribution;
