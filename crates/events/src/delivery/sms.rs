//! SMS alert delivery via the Twilio REST API.
//!
//! [`SmsDelivery`] posts a single message to
//! `{api_base}/2010-04-01/Accounts/{sid}/Messages.json` using HTTP basic
//! auth. Each send is one request; there is no retry.

use std::time::Duration;

use async_trait::async_trait;
use quakewatch_core::channels::CHANNEL_SMS;
use serde::Deserialize;

use super::{ChannelError, NotificationChannel};

/// Production Twilio API root.
const DEFAULT_API_BASE: &str = "https://api.twilio.com";

/// HTTP request timeout for a single send.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for SMS delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("SMS request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway rejected the message (bad credentials, unverified number...).
    #[error("SMS gateway returned HTTP {status}: {reason}")]
    Rejected { status: u16, reason: String },
}

/// Error body returned by Twilio on non-2xx responses.
#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    message: Option<String>,
}

// ---------------------------------------------------------------------------
// SmsConfig
// ---------------------------------------------------------------------------

/// Configuration for the SMS channel.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sending number in E.164 form, e.g. `+15005550006`.
    pub from_number: String,
    /// Recipient number in E.164 form.
    pub to_number: String,
    /// API root; overridable for regional edges or test doubles.
    pub api_base: String,
}

impl SmsConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `TWILIO_ACCOUNT_SID` is not set, meaning SMS is not
    /// configured. The remaining values are validated by [`SmsDelivery::new`].
    ///
    /// | Variable             | Required | Default                  |
    /// |----------------------|----------|--------------------------|
    /// | `TWILIO_ACCOUNT_SID` | yes      | —                        |
    /// | `TWILIO_AUTH_TOKEN`  | yes      | —                        |
    /// | `TWILIO_FROM`        | yes      | —                        |
    /// | `TWILIO_TO`          | yes      | —                        |
    /// | `TWILIO_API_BASE`    | no       | `https://api.twilio.com` |
    pub fn from_env() -> Option<Self> {
        let account_sid = std::env::var("TWILIO_ACCOUNT_SID").ok()?;
        Some(Self {
            account_sid,
            auth_token: std::env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
            from_number: std::env::var("TWILIO_FROM").unwrap_or_default(),
            to_number: std::env::var("TWILIO_TO").unwrap_or_default(),
            api_base: std::env::var("TWILIO_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// SmsDelivery
// ---------------------------------------------------------------------------

/// Sends alert text messages through Twilio.
pub struct SmsDelivery {
    client: reqwest::Client,
    messages_url: reqwest::Url,
    config: SmsConfig,
}

impl SmsDelivery {
    /// Validate `config` and build the HTTP client.
    pub fn new(config: SmsConfig) -> Result<Self, ChannelError> {
        if config.account_sid.trim().is_empty() {
            return Err(ChannelError::Configuration("Twilio account SID is empty".into()));
        }
        if config.auth_token.trim().is_empty() {
            return Err(ChannelError::Configuration("Twilio auth token is empty".into()));
        }
        validate_phone_number(&config.from_number, "sender")?;
        validate_phone_number(&config.to_number, "recipient")?;

        let messages_url = reqwest::Url::parse(&format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            config.api_base.trim_end_matches('/'),
            config.account_sid
        ))
        .map_err(|e| ChannelError::Configuration(format!("Invalid Twilio API base: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ChannelError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            messages_url,
            config,
        })
    }

    async fn deliver(&self, body: &str) -> Result<(), SmsError> {
        let form = [
            ("To", self.config.to_number.as_str()),
            ("From", self.config.from_number.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(self.messages_url.clone())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SmsError::Rejected {
                status: status.as_u16(),
                reason: rejection_reason(&text),
            });
        }

        tracing::info!(to = %self.config.to_number, "Alert SMS sent");
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for SmsDelivery {
    fn name(&self) -> &str {
        CHANNEL_SMS
    }

    async fn send(&self, message: &str) -> Result<(), ChannelError> {
        Ok(self.deliver(message).await?)
    }
}

/// Extract the human-readable reason from a Twilio error body.
fn rejection_reason(body: &str) -> String {
    serde_json::from_str::<TwilioErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "no response body".to_string()
            } else {
                trimmed.to_string()
            }
        })
}

/// E.164: a leading `+` followed by 8 to 15 digits.
fn validate_phone_number(number: &str, role: &str) -> Result<(), ChannelError> {
    let digits = number.strip_prefix('+').unwrap_or("");
    let valid = (8..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit());
    if !valid {
        return Err(ChannelError::Configuration(format!(
            "SMS {role} number '{number}' is not in E.164 form"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn config() -> SmsConfig {
        SmsConfig {
            account_sid: "AC0123456789abcdef0123456789abcdef".into(),
            auth_token: "token".into(),
            from_number: "+15005550006".into(),
            to_number: "+923001234567".into(),
            api_base: DEFAULT_API_BASE.into(),
        }
    }

    #[test]
    fn from_env_returns_none_without_account_sid() {
        std::env::remove_var("TWILIO_ACCOUNT_SID");
        assert!(SmsConfig::from_env().is_none());
    }

    #[test]
    fn new_accepts_valid_config() {
        let delivery = SmsDelivery::new(config()).unwrap();
        assert_eq!(delivery.name(), CHANNEL_SMS);
        assert_eq!(
            delivery.messages_url.as_str(),
            "https://api.twilio.com/2010-04-01/Accounts/AC0123456789abcdef0123456789abcdef/Messages.json"
        );
    }

    #[test]
    fn new_rejects_empty_token() {
        let cfg = SmsConfig {
            auth_token: String::new(),
            ..config()
        };
        assert_matches!(
            SmsDelivery::new(cfg).err(),
            Some(ChannelError::Configuration(_))
        );
    }

    #[test]
    fn new_rejects_number_without_country_code() {
        let cfg = SmsConfig {
            to_number: "03001234567".into(),
            ..config()
        };
        let err = SmsDelivery::new(cfg).err().unwrap();
        assert!(err.to_string().contains("recipient number"));
    }

    #[test]
    fn new_rejects_unparseable_api_base() {
        let cfg = SmsConfig {
            api_base: "not a url".into(),
            ..config()
        };
        assert_matches!(
            SmsDelivery::new(cfg).err(),
            Some(ChannelError::Configuration(_))
        );
    }

    #[test]
    fn rejection_reason_prefers_twilio_message() {
        let body = r#"{"code": 20003, "message": "Authenticate", "status": 401}"#;
        assert_eq!(rejection_reason(body), "Authenticate");
    }

    #[test]
    fn rejection_reason_falls_back_to_raw_body() {
        assert_eq!(rejection_reason("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(rejection_reason(""), "no response body");
    }

    #[test]
    fn rejected_error_display() {
        let err = SmsError::Rejected {
            status: 401,
            reason: "Authenticate".into(),
        };
        assert_eq!(err.to_string(), "SMS gateway returned HTTP 401: Authenticate");
    }
}
