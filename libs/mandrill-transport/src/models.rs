//! Payload and result models for the transport.

use serde_json::{Map, Value};

use crate::address::AddressInput;
use crate::response::SendResponse;

/// A message handed to the transport by the caller. Read-only to the
/// transport; nothing here is mutated during a send.
#[derive(Debug, Clone, Default)]
pub struct SendPayload {
    /// Primary recipients.
    pub to: AddressInput,
    /// Carbon-copy recipients.
    pub cc: AddressInput,
    /// Blind-carbon-copy recipients.
    pub bcc: AddressInput,
    /// Sender. Only the first parsed address is used; when none parses,
    /// the request proceeds with absent sender fields.
    pub from: AddressInput,
    /// Message subject.
    pub subject: String,
    /// Plain text body.
    pub text: Option<String>,
    /// HTML body.
    pub html: Option<String>,
    /// Message-level Mandrill overrides (e.g. `preserve_recipients`),
    /// shallow-merged onto the wire message with caller keys winning.
    pub mandrill_options: Option<Map<String, Value>>,
}

/// Outcome of a send call after classification.
#[derive(Debug, Clone)]
pub struct SentMessage {
    /// Id of the first result entry. Mandrill reports one id across the
    /// per-recipient entries of a call, so a single id is the contract;
    /// `None` only when the provider returned no entries.
    pub message_id: Option<String>,
    /// Entries the provider accepted for delivery.
    pub accepted: Vec<SendResponse>,
    /// Entries the provider refused, including unrecognized statuses.
    pub rejected: Vec<SendResponse>,
}
