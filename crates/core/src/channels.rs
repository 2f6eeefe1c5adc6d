//! Well-known notification channel identifier constants.
//!
//! These are the keys channel senders report under in a dispatch report.

/// SMS text message delivered via the Twilio REST API.
pub const CHANNEL_SMS: &str = "sms";

/// Email notification delivered via SMTP.
pub const CHANNEL_EMAIL: &str = "email";

/// Webhook notification delivered to an external HTTP endpoint.
pub const CHANNEL_WEBHOOK: &str = "webhook";
