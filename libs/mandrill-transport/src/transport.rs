//! The transport itself: builds the wire message from a payload, makes
//! the single provider call, and classifies the result.

use serde_json::Value;
use tracing::{debug, info};

use crate::address::{Address, AddressInput, format_address};
use crate::client::{
    HttpMandrillClient, MandrillClient, MandrillConfig, Message, Recipient, RecipientType,
};
use crate::error::TransportResult;
use crate::models::{SendPayload, SentMessage};
use crate::response::classify;

/// Transport name exposed to host mail libraries.
pub const TRANSPORT_NAME: &str = "Mandrill";

/// Mail transport backed by the Mandrill `messages/send` API.
///
/// Generic over the API client so the send path can be exercised with a
/// substitute implementation; production wires in [`HttpMandrillClient`].
/// The transport holds no mutable state, so concurrent sends are
/// independent.
pub struct MandrillTransport<C = HttpMandrillClient> {
    client: C,
}

impl MandrillTransport<HttpMandrillClient> {
    /// Create a transport with the production HTTP client.
    pub fn new(config: MandrillConfig) -> Self {
        Self::with_client(HttpMandrillClient::new(config))
    }

    /// Create a transport configured from environment variables.
    pub fn from_env() -> TransportResult<Self> {
        Ok(Self::with_client(HttpMandrillClient::from_env()?))
    }
}

impl<C: MandrillClient> MandrillTransport<C> {
    /// Create a transport over a custom client implementation.
    pub fn with_client(client: C) -> Self {
        Self { client }
    }

    /// Transport name for host-library introspection.
    pub fn name(&self) -> &'static str {
        TRANSPORT_NAME
    }

    /// Packaged release version.
    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Send one message through the provider.
    ///
    /// Provider-side per-recipient rejections are not errors: they come
    /// back in [`SentMessage::rejected`] and the call still succeeds.
    /// Only a failed provider call returns `Err`, and the provider's
    /// error passes through unwrapped. No retry.
    pub async fn send(&self, payload: &SendPayload) -> TransportResult<SentMessage> {
        let message = build_message(payload)?;

        debug!(
            recipients = message.get("to").and_then(serde_json::Value::as_array).map_or(0, Vec::len),
            subject = %payload.subject,
            "Dispatching message"
        );

        let results = self.client.send_message(message).await?;

        // Mandrill reports one id across the entries of a call; the first
        // entry's id stands for the whole send.
        let message_id = results.first().map(|entry| entry.id.clone());
        let classification = classify(results);

        info!(
            message_id = ?message_id,
            accepted = classification.accepted.len(),
            rejected = classification.rejected.len(),
            "Send classified"
        );

        Ok(SentMessage {
            message_id,
            accepted: classification.accepted,
            rejected: classification.rejected,
        })
    }
}

fn recipients_of(input: &AddressInput, recipient_type: RecipientType) -> Vec<Recipient> {
    format_address(input)
        .into_iter()
        .map(|address| Recipient {
            email: address.email,
            name: address.name,
            recipient_type,
        })
        .collect()
}

/// Build the wire message object: role-tagged recipients in primary, cc,
/// bcc order, the first parsed sender (absent fields when none parses),
/// verbatim subject and bodies, then the caller's message-level overrides
/// merged on top.
fn build_message(payload: &SendPayload) -> TransportResult<Value> {
    let mut to = recipients_of(&payload.to, RecipientType::To);
    to.extend(recipients_of(&payload.cc, RecipientType::Cc));
    to.extend(recipients_of(&payload.bcc, RecipientType::Bcc));

    let (from_name, from_email) = match format_address(&payload.from).into_iter().next() {
        Some(Address { name, email }) => (name, Some(email)),
        None => (None, None),
    };

    let message = Message {
        html: payload.html.clone(),
        text: payload.text.clone(),
        subject: payload.subject.clone(),
        from_email,
        from_name,
        to,
    };

    let mut value = serde_json::to_value(&message)?;
    if let (Some(object), Some(options)) = (value.as_object_mut(), payload.mandrill_options.as_ref())
    {
        for (key, option) in options {
            object.insert(key.clone(), option.clone());
        }
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockMandrillClient;
    use crate::error::TransportError;
    use crate::response::{DeliveryStatus, SendResponse};
    use serde_json::json;

    fn full_payload() -> SendPayload {
        SendPayload {
            to: "Ada Lovelace <ada@example.com>, Grace Hopper <grace@example.com>".into(),
            cc: "Alan Turing <alan@example.com>, Edsger Dijkstra <edsger@example.com>".into(),
            bcc: "Barbara Liskov <barbara@example.com>, Donald Knuth <donald@example.com>".into(),
            from: "Build Bot <build@example.com>".into(),
            subject: "Nightly report".to_string(),
            text: Some("All green.".to_string()),
            html: Some("<p>All green.</p>".to_string()),
            mandrill_options: None,
        }
    }

    fn single_entry(status: DeliveryStatus) -> Vec<SendResponse> {
        vec![SendResponse {
            email: "ada@example.com".to_string(),
            status,
            id: "fake-id".to_string(),
            reject_reason: None,
        }]
    }

    fn client_with_status(status: DeliveryStatus) -> MockMandrillClient {
        let mut client = MockMandrillClient::new();
        client
            .expect_send_message()
            .times(1)
            .returning(move |_| Ok(single_entry(status)));
        client
    }

    #[test]
    fn test_exposes_name_and_version() {
        let transport = MandrillTransport::with_client(MockMandrillClient::new());
        assert_eq!(transport.name(), "Mandrill");
        assert_eq!(transport.version(), env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_recipients_are_flattened_in_role_order() {
        let mut client = MockMandrillClient::new();
        client
            .expect_send_message()
            .times(1)
            .withf(|message| {
                let to = message["to"].as_array().unwrap();
                assert_eq!(to.len(), 6);
                assert_eq!(to[0]["name"], "Ada Lovelace");
                assert_eq!(to[0]["email"], "ada@example.com");
                assert_eq!(to[0]["type"], "to");
                assert_eq!(to[1]["name"], "Grace Hopper");
                assert_eq!(to[1]["email"], "grace@example.com");
                assert_eq!(to[2]["type"], "cc");
                assert_eq!(to[2]["email"], "alan@example.com");
                assert_eq!(to[3]["type"], "cc");
                assert_eq!(to[3]["email"], "edsger@example.com");
                assert_eq!(to[4]["type"], "bcc");
                assert_eq!(to[4]["email"], "barbara@example.com");
                assert_eq!(to[5]["type"], "bcc");
                assert_eq!(to[5]["email"], "donald@example.com");
                assert_eq!(message["from_name"], "Build Bot");
                assert_eq!(message["from_email"], "build@example.com");
                assert_eq!(message["subject"], "Nightly report");
                assert_eq!(message["text"], "All green.");
                assert_eq!(message["html"], "<p>All green.</p>");
                true
            })
            .returning(|_| Ok(single_entry(DeliveryStatus::Sent)));

        let transport = MandrillTransport::with_client(client);
        let sent = transport.send(&full_payload()).await.unwrap();
        assert_eq!(sent.message_id.as_deref(), Some("fake-id"));
    }

    #[tokio::test]
    async fn test_sent_status_is_accepted() {
        let transport = MandrillTransport::with_client(client_with_status(DeliveryStatus::Sent));
        let sent = transport.send(&full_payload()).await.unwrap();
        assert_eq!(sent.accepted.len(), 1);
        assert_eq!(sent.rejected.len(), 0);
        assert_eq!(sent.message_id.as_deref(), Some("fake-id"));
    }

    #[tokio::test]
    async fn test_queued_status_is_accepted() {
        let transport = MandrillTransport::with_client(client_with_status(DeliveryStatus::Queued));
        let sent = transport.send(&full_payload()).await.unwrap();
        assert_eq!(sent.accepted.len(), 1);
        assert_eq!(sent.rejected.len(), 0);
        assert_eq!(sent.message_id.as_deref(), Some("fake-id"));
    }

    #[tokio::test]
    async fn test_scheduled_status_is_accepted() {
        let transport =
            MandrillTransport::with_client(client_with_status(DeliveryStatus::Scheduled));
        let sent = transport.send(&full_payload()).await.unwrap();
        assert_eq!(sent.accepted.len(), 1);
        assert_eq!(sent.rejected.len(), 0);
    }

    #[tokio::test]
    async fn test_invalid_status_is_rejected_without_error() {
        let transport = MandrillTransport::with_client(client_with_status(DeliveryStatus::Invalid));
        let sent = transport.send(&full_payload()).await.unwrap();
        assert_eq!(sent.accepted.len(), 0);
        assert_eq!(sent.rejected.len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_status_is_rejected_without_error() {
        let transport =
            MandrillTransport::with_client(client_with_status(DeliveryStatus::Rejected));
        let sent = transport.send(&full_payload()).await.unwrap();
        assert_eq!(sent.accepted.len(), 0);
        assert_eq!(sent.rejected.len(), 1);
    }

    #[tokio::test]
    async fn test_options_are_merged_onto_message() {
        let mut payload = full_payload();
        let mut options = serde_json::Map::new();
        options.insert("preserve_recipients".to_string(), json!(true));
        payload.mandrill_options = Some(options);

        let mut client = MockMandrillClient::new();
        client
            .expect_send_message()
            .times(1)
            .withf(|message| {
                assert_eq!(message["preserve_recipients"], true);
                // Unrelated fields stay intact.
                assert_eq!(message["subject"], "Nightly report");
                assert_eq!(message["to"].as_array().unwrap().len(), 6);
                true
            })
            .returning(|_| Ok(single_entry(DeliveryStatus::Sent)));

        let transport = MandrillTransport::with_client(client);
        transport.send(&payload).await.unwrap();
    }

    #[tokio::test]
    async fn test_option_overrides_built_field() {
        let mut payload = full_payload();
        let mut options = serde_json::Map::new();
        options.insert("subject".to_string(), json!("Overridden"));
        payload.mandrill_options = Some(options);

        let mut client = MockMandrillClient::new();
        client
            .expect_send_message()
            .times(1)
            .withf(|message| message["subject"] == "Overridden")
            .returning(|_| Ok(single_entry(DeliveryStatus::Sent)));

        let transport = MandrillTransport::with_client(client);
        transport.send(&payload).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_from_sends_with_absent_sender_fields() {
        let mut payload = full_payload();
        payload.from = AddressInput::None;

        let mut client = MockMandrillClient::new();
        client
            .expect_send_message()
            .times(1)
            .withf(|message| {
                message.get("from_email").is_none() && message.get("from_name").is_none()
            })
            .returning(|_| Ok(single_entry(DeliveryStatus::Sent)));

        let transport = MandrillTransport::with_client(client);
        transport.send(&payload).await.unwrap();
    }

    #[tokio::test]
    async fn test_provider_error_passes_through() {
        let mut client = MockMandrillClient::new();
        client
            .expect_send_message()
            .times(1)
            .returning(|_| Err(TransportError::Http("connection reset".to_string())));

        let transport = MandrillTransport::with_client(client);
        let err = transport.send(&full_payload()).await.unwrap_err();
        assert!(matches!(err, TransportError::Http(_)));
    }

    #[tokio::test]
    async fn test_empty_result_set_yields_no_message_id() {
        let mut client = MockMandrillClient::new();
        client
            .expect_send_message()
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let transport = MandrillTransport::with_client(client);
        let sent = transport.send(&full_payload()).await.unwrap();
        assert_eq!(sent.message_id, None);
        assert!(sent.accepted.is_empty());
        assert!(sent.rejected.is_empty());
    }
}
