//! Persistence and best-effort publication of suppression entries.

use std::sync::Arc;

use sesame_bus::EventBus;
use sesame_event::SuppressionEntry;
use sesame_store::SuppressionStore;
use tracing::warn;

use crate::error::IngestError;

/// Category under which suppression notifications are published.
pub const SUPPRESSION_CATEGORY: &str = "email-suppression";

/// Result of handling one suppression entry.
///
/// Persistence is mandatory; publication is best-effort. `published == false`
/// means the store write succeeded but the notification did not go out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishOutcome {
    pub published: bool,
}

/// Writes each suppression entry through the store, then announces it on the
/// bus.
pub struct SuppressionPublisher {
    store: Arc<dyn SuppressionStore>,
    bus: Arc<dyn EventBus>,
}

impl std::fmt::Debug for SuppressionPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuppressionPublisher").finish_non_exhaustive()
    }
}

impl SuppressionPublisher {
    #[must_use]
    pub fn new(store: Arc<dyn SuppressionStore>, bus: Arc<dyn EventBus>) -> Self {
        Self { store, bus }
    }

    /// Persist `entry`, then publish its outbound projection.
    ///
    /// A store failure propagates. A publish failure is logged and reported
    /// through the outcome: notification-channel unavailability must not
    /// block the durable suppression write.
    ///
    /// # Errors
    /// Returns the store-write failure, which is fatal for the batch.
    pub async fn apply(&self, entry: &SuppressionEntry) -> Result<PublishOutcome, IngestError> {
        self.store.put(entry).await?;

        let outcome = match serde_json::to_value(entry.outbound()) {
            Ok(payload) => match self.bus.publish(SUPPRESSION_CATEGORY, &payload).await {
                Ok(()) => PublishOutcome { published: true },
                Err(err) => {
                    warn!(
                        email = %entry.email_address,
                        error = %err,
                        "suppression notification not published, entry persisted"
                    );
                    PublishOutcome { published: false }
                }
            },
            Err(err) => {
                warn!(
                    email = %entry.email_address,
                    error = %err,
                    "suppression projection could not be serialized"
                );
                PublishOutcome { published: false }
            }
        };

        Ok(outcome)
    }
}
