//! Classification of delivery events into suppression entries.
//!
//! This is the decision table at the center of the pipeline: which recipient
//! addresses an event suppresses, and with what reason message. It is a pure
//! function over the normalized event; persistence and publication happen in
//! `sesame-ingest`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    envelope::{DeliveryEvent, EventKind},
    tags::Attribution,
};

/// A per-recipient suppression record.
///
/// `id` always equals `email_address`: the suppression store holds at most
/// one live entry per address, and a later write overwrites an earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuppressionEntry {
    pub id: String,
    pub email_address: String,
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub stage: String,
    pub message: String,
    pub message_id: String,
    pub company_id: String,
}

/// Published projection of a suppression entry.
///
/// Bounce and Reject notifications publish the full entry; Complaint
/// publishes only the address and company. The asymmetry is intentional and
/// preserved from the upstream system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutboundSuppressionEvent {
    Full(SuppressionEntry),
    #[serde(rename_all = "camelCase")]
    Reduced {
        email_address: String,
        company_id: String,
    },
}

impl SuppressionEntry {
    /// Project this entry into its published form.
    #[must_use]
    pub fn outbound(&self) -> OutboundSuppressionEvent {
        if self.kind == "Complaint" {
            OutboundSuppressionEvent::Reduced {
                email_address: self.email_address.clone(),
                company_id: self.company_id.clone(),
            }
        } else {
            OutboundSuppressionEvent::Full(self.clone())
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BounceDetail {
    #[serde(default)]
    bounced_recipients: Vec<BouncedRecipient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BouncedRecipient {
    email_address: String,
    #[serde(default)]
    diagnostic_code: Option<String>,
    #[serde(default)]
    action: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RejectDetail {
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComplaintDetail {
    #[serde(default)]
    complained_recipients: Vec<ComplainedRecipient>,
    #[serde(default)]
    complaint_feedback_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComplainedRecipient {
    email_address: String,
}

/// Map a normalized event to its suppression entries, in source order.
///
/// | kind | suppressed addresses | message |
/// |---|---|---|
/// | Bounce | each `detail.bouncedRecipients[].emailAddress` | first non-empty of `diagnosticCode`, `action` |
/// | Reject | every address in `mail.destination` | `detail.reason` |
/// | Complaint | each `detail.complainedRecipients[].emailAddress` | `detail.complaintFeedbackType` |
///
/// The Reject row deliberately suppresses the message's entire destination
/// list, not a rejected-only subset: the provider rejects the send as a
/// whole. Any other event kind yields no entries, and a detail object that
/// does not match the expected shape classifies to zero entries rather than
/// failing the record.
#[must_use]
pub fn classify(event: &DeliveryEvent, attribution: &Attribution) -> Vec<SuppressionEntry> {
    match &event.kind {
        EventKind::Bounce => {
            let detail: BounceDetail = lenient(&event.detail);
            detail
                .bounced_recipients
                .into_iter()
                .map(|recipient| {
                    let message = recipient
                        .diagnostic_code
                        .filter(|code| !code.is_empty())
                        .or(recipient.action)
                        .unwrap_or_default();
                    entry(event, attribution, recipient.email_address, message)
                })
                .collect()
        }
        EventKind::Reject => {
            let detail: RejectDetail = lenient(&event.detail);
            let reason = detail.reason.unwrap_or_default();
            event
                .mail
                .destination
                .iter()
                .map(|address| entry(event, attribution, address.clone(), reason.clone()))
                .collect()
        }
        EventKind::Complaint => {
            let detail: ComplaintDetail = lenient(&event.detail);
            let feedback = detail.complaint_feedback_type.unwrap_or_default();
            detail
                .complained_recipients
                .into_iter()
                .map(|recipient| {
                    entry(event, attribution, recipient.email_address, feedback.clone())
                })
                .collect()
        }
        EventKind::Other(_) => Vec::new(),
    }
}

fn entry(
    event: &DeliveryEvent,
    attribution: &Attribution,
    email_address: String,
    message: String,
) -> SuppressionEntry {
    SuppressionEntry {
        id: email_address.clone(),
        email_address,
        timestamp: event.timestamp.clone(),
        kind: event.event_type.clone(),
        stage: attribution.stage.clone(),
        message,
        message_id: event.mail.message_id.clone(),
        company_id: attribution.company_id.clone(),
    }
}

fn lenient<T: serde::de::DeserializeOwned + Default>(detail: &Value) -> T {
    serde_json::from_value(detail.clone()).unwrap_or_else(|err| {
        debug!(error = %err, "event detail did not match the expected shape");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::envelope::MailMetadata;

    fn event(kind: &str, detail: Value, destination: &[&str]) -> DeliveryEvent {
        DeliveryEvent {
            kind: EventKind::from(kind),
            event_type: kind.to_string(),
            mail: MailMetadata {
                message_id: "0100-abc".to_string(),
                destination: destination.iter().map(ToString::to_string).collect(),
                ..MailMetadata::default()
            },
            detail,
            timestamp: "2025-03-20T14:51:11.257Z".to_string(),
        }
    }

    fn attribution() -> Attribution {
        Attribution {
            company_id: "42".to_string(),
            stage: "prod".to_string(),
        }
    }

    #[test]
    fn bounce_suppresses_each_bounced_recipient() {
        let detail = json!({
            "bouncedRecipients": [
                {"emailAddress": "a@x.com", "diagnosticCode": "5.1.1"},
                {"emailAddress": "b@x.com", "action": "failed"},
                {"emailAddress": "c@x.com"}
            ]
        });

        let entries = classify(&event("Bounce", detail, &["a@x.com"]), &attribution());

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].id, "a@x.com");
        assert_eq!(entries[0].message, "5.1.1");
        assert_eq!(entries[1].message, "failed");
        assert_eq!(entries[2].message, "");
        assert!(entries.iter().all(|entry| entry.kind == "Bounce"
            && entry.company_id == "42"
            && entry.stage == "prod"
            && entry.message_id == "0100-abc"));
    }

    #[test]
    fn bounce_empty_diagnostic_code_falls_back_to_action() {
        let detail = json!({
            "bouncedRecipients": [
                {"emailAddress": "a@x.com", "diagnosticCode": "", "action": "failed"}
            ]
        });

        let entries = classify(&event("Bounce", detail, &[]), &attribution());
        assert_eq!(entries[0].message, "failed");
    }

    #[test]
    fn reject_suppresses_the_entire_destination_list() {
        let detail = json!({"reason": "Bad content"});
        let entries = classify(
            &event("Reject", detail, &["a@x.com", "b@y.com", "c@z.com"]),
            &attribution(),
        );

        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries.iter().map(|entry| entry.id.as_str()).collect::<Vec<_>>(),
            vec!["a@x.com", "b@y.com", "c@z.com"]
        );
        assert!(entries.iter().all(|entry| entry.message == "Bad content"));
    }

    #[test]
    fn reject_without_reason_uses_empty_message() {
        let entries = classify(&event("Reject", json!({}), &["a@x.com"]), &attribution());
        assert_eq!(entries[0].message, "");
    }

    #[test]
    fn complaint_suppresses_each_complained_recipient() {
        let detail = json!({
            "complainedRecipients": [{"emailAddress": "b@y.com"}],
            "complaintFeedbackType": "abuse"
        });

        let entries = classify(&event("Complaint", detail, &["b@y.com"]), &attribution());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "b@y.com");
        assert_eq!(entries[0].message, "abuse");
    }

    #[test]
    fn other_event_kinds_produce_no_entries() {
        for kind in ["Delivery", "Open", "Click", "Send", "bounce"] {
            assert!(classify(&event(kind, json!({}), &["a@x.com"]), &attribution()).is_empty());
        }
    }

    #[test]
    fn malformed_detail_classifies_to_zero_entries() {
        let detail = json!({"bouncedRecipients": "not a list"});
        assert!(classify(&event("Bounce", detail, &[]), &attribution()).is_empty());
    }

    #[test]
    fn bounce_publishes_the_full_entry() {
        let detail = json!({"bouncedRecipients": [{"emailAddress": "a@x.com"}]});
        let entries = classify(&event("Bounce", detail, &[]), &attribution());

        assert!(matches!(
            entries[0].outbound(),
            OutboundSuppressionEvent::Full(_)
        ));
    }

    #[test]
    fn complaint_publishes_only_address_and_company() {
        let detail = json!({"complainedRecipients": [{"emailAddress": "b@y.com"}]});
        let entries = classify(&event("Complaint", detail, &[]), &attribution());

        let projected = serde_json::to_value(entries[0].outbound()).unwrap();
        assert_eq!(
            projected,
            json!({"emailAddress": "b@y.com", "companyId": "42"})
        );
    }

    #[test]
    fn full_projection_serializes_in_camel_case() {
        let detail = json!({"bouncedRecipients": [{"emailAddress": "a@x.com", "diagnosticCode": "5.1.1"}]});
        let entries = classify(&event("Bounce", detail, &[]), &attribution());

        let projected = serde_json::to_value(entries[0].outbound()).unwrap();
        assert_eq!(
            projected,
            json!({
                "id": "a@x.com",
                "emailAddress": "a@x.com",
                "timestamp": "2025-03-20T14:51:11.257Z",
                "type": "Bounce",
                "stage": "prod",
                "message": "5.1.1",
                "messageId": "0100-abc",
                "companyId": "42"
            })
        );
    }
}
