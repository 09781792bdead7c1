//! Robot trait and the reqwest-backed webhook client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::RobotError;
use crate::message::{Message, Receipt};

/// Send endpoint for DingTalk custom robots; the access token is appended
/// as a query parameter.
pub const DEFAULT_ENDPOINT: &str = "https://oapi.dingtalk.com/robot/send";

/// A webhook destination that accepts [`Message`] envelopes.
///
/// The seam between message delivery and everything above it; tests swap
/// in recording or failing doubles.
#[async_trait]
pub trait Robot: Send + Sync {
    /// Deliver one message and decode the endpoint's receipt.
    async fn send(&self, message: &Message) -> Result<(), RobotError>;
}

/// HTTP client for one robot webhook.
pub struct RobotClient {
    webhook: String,
    http: Client,
}

impl RobotClient {
    /// Create a client for a full webhook URL.
    ///
    /// The timeout bounds the whole request; a hung endpoint must not
    /// stall the caller indefinitely.
    pub fn new(webhook: impl Into<String>, timeout: Duration) -> Result<Self, RobotError> {
        let http = Client::builder().timeout(timeout).build().map_err(RobotError::Network)?;

        Ok(Self {
            webhook: webhook.into(),
            http,
        })
    }

    /// Create a client from a robot access token using [`DEFAULT_ENDPOINT`].
    pub fn from_token(token: &str, timeout: Duration) -> Result<Self, RobotError> {
        Self::new(format!("{DEFAULT_ENDPOINT}?access_token={token}"), timeout)
    }
}

#[async_trait]
impl Robot for RobotClient {
    async fn send(&self, message: &Message) -> Result<(), RobotError> {
        message.validate()?;
        debug!(kind = message.kind(), "posting robot message");

        let response = self
            .http
            .post(&self.webhook)
            .header("Content-Type", "application/json; charset=utf-8")
            .json(message)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        let receipt: Receipt = serde_json::from_str(&body).map_err(|_| RobotError::MalformedResponse {
            status,
            body: body.clone(),
        })?;

        if receipt.errcode != 0 {
            return Err(RobotError::Application {
                code: receipt.errcode,
                message: receipt.errmsg,
            });
        }

        debug!(kind = message.kind(), "robot accepted message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token_builds_endpoint_url() {
        let client = RobotClient::from_token("abcdef", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.webhook,
            "https://oapi.dingtalk.com/robot/send?access_token=abcdef"
        );
    }

    #[test]
    fn test_new_keeps_url_verbatim() {
        let client = RobotClient::new("https://hooks.example.com/x?t=1", Duration::from_secs(5)).unwrap();
        assert_eq!(client.webhook, "https://hooks.example.com/x?t=1");
    }

    #[tokio::test]
    async fn test_send_rejects_invalid_message_before_any_network_call() {
        // Unroutable webhook: if validation did not short-circuit, this
        // would surface as a network error instead.
        let client = RobotClient::new("http://127.0.0.1:1/", Duration::from_millis(200)).unwrap();

        let err = client.send(&Message::text("  ")).await.unwrap_err();
        assert!(matches!(err, RobotError::InvalidMessage(_)));
    }

    #[tokio::test]
    async fn test_send_maps_connection_failure_to_network_error() {
        let client = RobotClient::new("http://127.0.0.1:1/", Duration::from_millis(500)).unwrap();

        let err = client.send(&Message::text("hello")).await.unwrap_err();
        assert!(matches!(err, RobotError::Network(_)));
        assert!(err.is_transient());
    }
}
