//! Tenant and environment attribution from message tags.
//!
//! Outbound sends carry free-form tags; `empresa` identifies the sending
//! company and `stage` the environment. Both are operator-controlled and
//! optional, so extraction must never fail a record: anything that does not
//! look like a list of strings falls back to the defaults.

use serde_json::Value;
use tracing::debug;

/// Company fallback when no usable `empresa` tag is present.
pub const DEFAULT_COMPANY_ID: &str = "0";

/// Stage fallback when no usable `stage` tag is present.
pub const DEFAULT_STAGE: &str = "produccion";

/// Tenant and environment attribution for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    pub company_id: String,
    pub stage: String,
}

impl Default for Attribution {
    fn default() -> Self {
        Self {
            company_id: DEFAULT_COMPANY_ID.to_string(),
            stage: DEFAULT_STAGE.to_string(),
        }
    }
}

impl Attribution {
    /// Extract attribution from the `tags` value of the mail metadata.
    ///
    /// Multi-valued tags are joined with `","`. Falling back to a default is
    /// logged but never affects control flow.
    #[must_use]
    pub fn from_tags(tags: &Value) -> Self {
        Self {
            company_id: tag_value(tags, "empresa").unwrap_or_else(|| {
                debug!(tag = "empresa", default = DEFAULT_COMPANY_ID, "tag missing or malformed");
                DEFAULT_COMPANY_ID.to_string()
            }),
            stage: tag_value(tags, "stage").unwrap_or_else(|| {
                debug!(tag = "stage", default = DEFAULT_STAGE, "tag missing or malformed");
                DEFAULT_STAGE.to_string()
            }),
        }
    }
}

/// Join a tag's values with `,`, or `None` when the tag is absent or the tag
/// data is not shaped like a list of strings.
fn tag_value(tags: &Value, name: &str) -> Option<String> {
    let values: Option<Vec<&str>> = tags.get(name)?.as_array()?.iter().map(Value::as_str).collect();
    values.map(|values| values.join(","))
}
