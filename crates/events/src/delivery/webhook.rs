//! Webhook alert delivery.
//!
//! [`WebhookDelivery`] POSTs the alert text as JSON to an external URL.
//! One attempt per send; callers wanting retries wrap the dispatch.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use quakewatch_core::channels::CHANNEL_WEBHOOK;

use super::{ChannelError, NotificationChannel};

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for webhook delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// WebhookDelivery
// ---------------------------------------------------------------------------

/// Delivers alert messages to one external webhook endpoint.
pub struct WebhookDelivery {
    client: reqwest::Client,
    url: reqwest::Url,
}

impl WebhookDelivery {
    /// Create a delivery service for `url`, which must be an http(s) URL.
    pub fn new(url: &str) -> Result<Self, ChannelError> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| ChannelError::Configuration(format!("Invalid webhook URL '{url}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ChannelError::Configuration(format!(
                "Webhook URL must be http or https, got '{}'",
                url.scheme()
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ChannelError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self { client, url })
    }

    /// Load the endpoint from `ALERT_WEBHOOK_URL`; `None` if unset.
    pub fn from_env() -> Option<Result<Self, ChannelError>> {
        std::env::var("ALERT_WEBHOOK_URL")
            .ok()
            .map(|url| Self::new(&url))
    }

    /// Execute a single POST request and check the response status.
    async fn deliver(&self, message: &str) -> Result<(), WebhookError> {
        let payload = serde_json::json!({
            "message": message,
            "sent_at": Utc::now(),
        });

        let response = self.client.post(self.url.clone()).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(WebhookError::HttpStatus(response.status().as_u16()));
        }

        tracing::info!(url = %self.url, "Alert webhook delivered");
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for WebhookDelivery {
    fn name(&self) -> &str {
        CHANNEL_WEBHOOK
    }

    async fn send(&self, message: &str) -> Result<(), ChannelError> {
        Ok(self.deliver(message).await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn new_accepts_https_url() {
        let delivery = WebhookDelivery::new("https://hooks.example.com/quake").unwrap();
        assert_eq!(delivery.name(), CHANNEL_WEBHOOK);
    }

    #[test]
    fn new_rejects_relative_url() {
        assert_matches!(
            WebhookDelivery::new("/quake").err(),
            Some(ChannelError::Configuration(_))
        );
    }

    #[test]
    fn new_rejects_non_http_scheme() {
        let err = WebhookDelivery::new("ftp://example.com/hook").err().unwrap();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn webhook_error_display_http_status() {
        let err = WebhookError::HttpStatus(502);
        assert_eq!(err.to_string(), "Webhook returned HTTP 502");
    }

    #[test]
    fn webhook_error_display_request() {
        // Build a reqwest error from an invalid URL.
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = WebhookError::Request(req_err);
        assert!(err.to_string().contains("HTTP request failed"));
    }
}
