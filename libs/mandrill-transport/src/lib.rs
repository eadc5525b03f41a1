//! Mandrill mail transport.
//!
//! Sends messages through the Mandrill (Mailchimp Transactional)
//! `messages/send` API on behalf of a generic mail-sending host. The
//! transport owns exactly three things: turning flexible address input
//! into the structured recipient list Mandrill expects, handing the built
//! message to the API client, and partitioning the per-recipient response
//! into accepted and rejected entries.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   SendPayload    │  ← caller-owned message description
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │ MandrillTransport│  ← formats recipients, builds the wire message
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │  MandrillClient  │  ← messages/send call (HTTP in production)
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │     classify     │  ← accepted / rejected partition
//! └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use mandrill_transport::{MandrillConfig, MandrillTransport, SendPayload};
//!
//! let transport = MandrillTransport::new(MandrillConfig::new("api-key"));
//!
//! let payload = SendPayload {
//!     to: "Ada Lovelace <ada@example.com>".into(),
//!     from: "Ops <ops@example.com>".into(),
//!     subject: "Hello".to_string(),
//!     text: Some("Hello!".to_string()),
//!     ..Default::default()
//! };
//!
//! let sent = transport.send(&payload).await?;
//! println!("message id: {:?}", sent.message_id);
//! ```

pub mod address;
pub mod client;
pub mod error;
pub mod models;
pub mod response;
pub mod transport;

// Re-export commonly used types
pub use address::{Address, AddressInput, format_address};
pub use client::{HttpMandrillClient, MandrillClient, MandrillConfig};
pub use error::{TransportError, TransportResult};
pub use models::{SendPayload, SentMessage};
pub use response::{Classification, DeliveryStatus, SendResponse, classify};
pub use transport::MandrillTransport;
