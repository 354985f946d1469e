//! Ingestion pipeline settings.

use serde::Deserialize;
use sesame_event::DEFAULT_TTL_MINUTES;

/// Tunables for the ingestion pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Minutes an audit record stays live before store-side expiry.
    ///
    /// Default: 525 600 (one year).
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: i64,
}

const fn default_ttl_minutes() -> i64 {
    DEFAULT_TTL_MINUTES
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_ttl_minutes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_defaults_to_one_year() {
        let config: IngestConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(config.ttl_minutes, 525_600);
    }
}
