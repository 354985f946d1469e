//! Epoch and TTL arithmetic for event timestamps.
//!
//! Expiration windows are computed in absolute (UTC) milliseconds rather than
//! calendar units, so results are deterministic across DST boundaries.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use thiserror::Error;

/// Errors raised while interpreting event timestamps.
#[derive(Debug, Error)]
pub enum TimeError {
    /// The timestamp string is not ISO-8601.
    #[error("malformed timestamp {timestamp:?}: {reason}")]
    MalformedTimestamp { timestamp: String, reason: String },
}

/// Parse an ISO-8601 timestamp into milliseconds since the Unix epoch.
///
/// Accepts RFC 3339 forms (`2025-03-20T14:51:11.257Z`, explicit offsets) as
/// well as naive timestamps without an offset, which are interpreted as UTC.
///
/// # Errors
/// Returns [`TimeError::MalformedTimestamp`] if the string parses as neither.
pub fn parse_iso_millis(timestamp: &str) -> Result<i64, TimeError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return Ok(parsed.with_timezone(&Utc).timestamp_millis());
    }

    timestamp
        .parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc().timestamp_millis())
        .map_err(|err| TimeError::MalformedTimestamp {
            timestamp: timestamp.to_string(),
            reason: err.to_string(),
        })
}

/// Add a window of `minutes` to an ISO-8601 timestamp, in absolute time.
///
/// Returns milliseconds since the Unix epoch.
///
/// # Errors
/// Propagates the parse failure for a malformed timestamp.
pub fn add_minutes(timestamp: &str, minutes: i64) -> Result<i64, TimeError> {
    Ok(parse_iso_millis(timestamp)? + minutes * 60_000)
}

/// Truncate epoch milliseconds down to whole epoch seconds.
#[must_use]
pub const fn epoch_seconds(epoch_millis: i64) -> i64 {
    epoch_millis.div_euclid(1000)
}

/// Current wall-clock time rendered as RFC 3339 with millisecond precision.
#[must_use]
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
