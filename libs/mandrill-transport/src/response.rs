//! Provider response classification.
//!
//! Mandrill answers a `messages/send` call with one result entry per
//! recipient, in request order. [`classify`] partitions those entries
//! into accepted and rejected buckets for the generic caller.

use serde::{Deserialize, Serialize};

/// Per-message delivery status reported by the Mandrill API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Queued,
    Scheduled,
    Invalid,
    Rejected,
    /// Any status this crate does not recognize. Classified as rejected.
    #[serde(other)]
    Unknown,
}

impl DeliveryStatus {
    /// Whether the provider accepted the message for delivery.
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Sent | Self::Queued | Self::Scheduled)
    }
}

/// One per-recipient result entry from a `messages/send` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendResponse {
    /// Recipient address this entry refers to.
    pub email: String,
    /// Delivery status for this recipient.
    pub status: DeliveryStatus,
    /// Provider-assigned message id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Populated when the status is `rejected`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<String>,
}

/// Partition of provider results into accepted and rejected entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub accepted: Vec<SendResponse>,
    pub rejected: Vec<SendResponse>,
}

/// Split results on delivery status, preserving order within each bucket.
///
/// `sent`, `queued`, and `scheduled` are accepted; everything else,
/// including statuses unknown to this crate, is rejected.
pub fn classify(results: Vec<SendResponse>) -> Classification {
    let mut classification = Classification::default();
    for result in results {
        if result.status.is_accepted() {
            classification.accepted.push(result);
        } else {
            classification.rejected.push(result);
        }
    }
    classification
}
