//! External delivery channels for alert notifications.
//!
//! Every channel implements [`NotificationChannel`]. Credentials and
//! addresses are validated when a channel is constructed, so a misconfigured
//! channel fails at startup rather than on the first alert.

use async_trait::async_trait;

pub mod email;
pub mod sms;
pub mod webhook;

use email::EmailError;
use sms::SmsError;
use webhook::WebhookError;

/// Error type shared by all channels.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Missing or invalid credentials, addresses, or endpoints.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Sms(#[from] SmsError),

    #[error(transparent)]
    Email(#[from] EmailError),

    #[error(transparent)]
    Webhook(#[from] WebhookError),

    /// Failure reported by a channel implemented outside this crate.
    #[error("Delivery failed: {0}")]
    Other(String),
}

/// A delivery mechanism for one composed alert message.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Identifier the channel reports under, e.g. `"sms"`.
    fn name(&self) -> &str;

    /// Attempt delivery once. Implementations must not retry internally.
    async fn send(&self, message: &str) -> Result<(), ChannelError>;
}
