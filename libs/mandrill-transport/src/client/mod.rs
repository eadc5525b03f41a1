//! Mandrill API client.
//!
//! This module contains the [`MandrillClient`] trait, the wire request
//! types, and the reqwest-backed production implementation.

mod http;

pub use http::{HttpMandrillClient, MandrillConfig};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::TransportResult;
use crate::response::SendResponse;

/// Header placement of a recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    To,
    Cc,
    Bcc,
}

/// One recipient entry on the wire message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipient {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub recipient_type: RecipientType,
}

/// The `message` object of a `messages/send` request, before caller
/// overrides are merged on top.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    /// All recipients, role-tagged: primary first, then cc, then bcc.
    pub to: Vec<Recipient>,
}

/// Trait for the `messages/send` API call.
///
/// The production implementation is [`HttpMandrillClient`]; the transport
/// is generic over this trait so tests can inject a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MandrillClient: Send + Sync {
    /// Send a fully built message object, returning one result entry per
    /// recipient in request order, or the provider's error verbatim.
    async fn send_message(&self, message: Value) -> TransportResult<Vec<SendResponse>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(RecipientType::Cc).unwrap(),
            serde_json::json!("cc")
        );
    }

    #[test]
    fn test_recipient_without_name_omits_field() {
        let recipient = Recipient {
            email: "ada@example.com".to_string(),
            name: None,
            recipient_type: RecipientType::To,
        };
        let value = serde_json::to_value(&recipient).unwrap();
        assert!(value.get("name").is_none());
        assert_eq!(value["type"], "to");
    }

    #[test]
    fn test_message_omits_absent_optionals() {
        let message = Message {
            subject: "S".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&message).unwrap();
        assert!(value.get("from_email").is_none());
        assert!(value.get("from_name").is_none());
        assert!(value.get("text").is_none());
        assert!(value.get("html").is_none());
        assert_eq!(value["subject"], "S");
    }
}
