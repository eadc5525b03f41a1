//! reqwest-backed Mandrill client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use super::MandrillClient;
use crate::error::{TransportError, TransportResult};
use crate::response::SendResponse;

/// Mandrill API configuration.
#[derive(Debug, Clone)]
pub struct MandrillConfig {
    /// Mandrill API key.
    pub api_key: String,
    /// API base URL (defaults to production).
    pub api_url: String,
}

impl MandrillConfig {
    /// Create a new configuration against the production API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: "https://mandrillapp.com/api/1.0".to_string(),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `MANDRILL_API_KEY` (required) and `MANDRILL_API_URL`
    /// (optional override, useful for test servers).
    pub fn from_env() -> TransportResult<Self> {
        let api_key = std::env::var("MANDRILL_API_KEY")
            .map_err(|_| TransportError::Config("MANDRILL_API_KEY not set".to_string()))?;
        let mut config = Self::new(api_key);
        if let Ok(api_url) = std::env::var("MANDRILL_API_URL") {
            config.api_url = api_url;
        }
        Ok(config)
    }
}

/// HTTP client for the Mandrill `messages/send` endpoint.
#[derive(Debug, Clone)]
pub struct HttpMandrillClient {
    config: MandrillConfig,
    client: Client,
}

impl HttpMandrillClient {
    /// Create a new client.
    pub fn new(config: MandrillConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Create a client configured from environment variables.
    pub fn from_env() -> TransportResult<Self> {
        Ok(Self::new(MandrillConfig::from_env()?))
    }
}

// Mandrill API request/response envelopes

#[derive(Debug, Serialize)]
struct SendMessageBody<'a> {
    key: &'a str,
    message: &'a Value,
    #[serde(rename = "async")]
    run_async: bool,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    name: String,
    message: String,
}

#[async_trait]
impl MandrillClient for HttpMandrillClient {
    async fn send_message(&self, message: Value) -> TransportResult<Vec<SendResponse>> {
        let body = SendMessageBody {
            key: &self.config.api_key,
            message: &message,
            run_async: false,
        };

        debug!(
            recipients = message.get("to").and_then(serde_json::Value::as_array).map_or(0, Vec::len),
            subject = message.get("subject").and_then(serde_json::Value::as_str).unwrap_or_default(),
            "Sending message via Mandrill"
        );

        let response = self
            .client
            .post(format!("{}/messages/send.json", self.config.api_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let results: Vec<SendResponse> = response.json().await?;
            info!(results = results.len(), "Mandrill accepted send call");
            Ok(results)
        } else {
            let error_body = response.text().await.unwrap_or_default();
            error!(
                status = %status,
                error = %error_body,
                "Mandrill send call failed"
            );

            // Mandrill reports errors as {"status":"error","code":…,"name":…,"message":…}
            match serde_json::from_str::<ApiError>(&error_body) {
                Ok(api) => Err(TransportError::Api {
                    code: api.code,
                    name: api.name,
                    message: api.message,
                }),
                Err(_) => Err(TransportError::Http(format!(
                    "Mandrill error ({}): {}",
                    status, error_body
                ))),
            }
        }
    }
}
