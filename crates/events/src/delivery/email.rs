//! Email alert delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport to send
//! plain-text alert emails. Configuration is loaded from environment
//! variables; if `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns
//! `None` and no mailer should be constructed.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use quakewatch_core::channels::CHANNEL_EMAIL;

use super::{ChannelError, NotificationChannel};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (implicit TLS).
const DEFAULT_SMTP_PORT: u16 = 465;

/// Port on which the server expects TLS from the first byte.
const IMPLICIT_TLS_PORT: u16 = 465;

/// Default subject line.
const DEFAULT_SUBJECT: &str = "Tsunami Alert";

/// Configuration for the SMTP email channel.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 465).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Alert recipient.
    pub to_address: String,
    /// Subject line for every alert email.
    pub subject: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped. Missing addresses
    /// are left empty and rejected by [`EmailDelivery::new`].
    ///
    /// | Variable              | Required | Default         |
    /// |-----------------------|----------|-----------------|
    /// | `SMTP_HOST`           | yes      | —               |
    /// | `SMTP_PORT`           | no       | `465`           |
    /// | `SMTP_FROM`           | yes      | —               |
    /// | `ALERT_EMAIL_TO`      | yes      | —               |
    /// | `ALERT_EMAIL_SUBJECT` | no       | `Tsunami Alert` |
    /// | `SMTP_USER`           | no       | —               |
    /// | `SMTP_PASSWORD`       | no       | —               |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM").unwrap_or_default(),
            to_address: std::env::var("ALERT_EMAIL_TO").unwrap_or_default(),
            subject: std::env::var("ALERT_EMAIL_SUBJECT")
                .unwrap_or_else(|_| DEFAULT_SUBJECT.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends alert emails via SMTP.
pub struct EmailDelivery {
    from: Mailbox,
    to: Mailbox,
    subject: String,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailDelivery {
    /// Validate `config` and build the SMTP transport.
    ///
    /// No connection is opened here; the transport connects on first send.
    pub fn new(config: EmailConfig) -> Result<Self, ChannelError> {
        if config.smtp_host.trim().is_empty() {
            return Err(ChannelError::Configuration("SMTP host is empty".into()));
        }

        let from = parse_mailbox(&config.from_address, "sender")?;
        let to = parse_mailbox(&config.to_address, "recipient")?;

        let credentials = match (config.smtp_user, config.smtp_password) {
            (Some(user), Some(pass)) => Some(Credentials::new(user, pass)),
            (None, None) => None,
            _ => {
                return Err(ChannelError::Configuration(
                    "SMTP user and password must be set together".into(),
                ))
            }
        };

        let relay = if config.smtp_port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        };
        let mut builder = relay
            .map_err(|e| ChannelError::Configuration(format!("SMTP transport: {e}")))?
            .port(config.smtp_port);
        if let Some(credentials) = credentials {
            builder = builder.credentials(credentials);
        }

        Ok(Self {
            from,
            to,
            subject: config.subject,
            mailer: builder.build(),
        })
    }

    async fn deliver(&self, body: &str) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(self.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailError::Build(e.to_string()))?;

        self.mailer.send(email).await?;

        tracing::info!(to = %self.to, "Alert email sent");
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for EmailDelivery {
    fn name(&self) -> &str {
        CHANNEL_EMAIL
    }

    async fn send(&self, message: &str) -> Result<(), ChannelError> {
        Ok(self.deliver(message).await?)
    }
}

fn parse_mailbox(address: &str, role: &str) -> Result<Mailbox, ChannelError> {
    if address.trim().is_empty() {
        return Err(ChannelError::Configuration(format!(
            "Email {role} address is empty"
        )));
    }
    address.parse().map_err(|e| {
        ChannelError::Configuration(format!("Invalid email {role} address '{address}': {e}"))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn config() -> EmailConfig {
        EmailConfig {
            smtp_host: "smtp.example.com".into(),
            smtp_port: 465,
            from_address: "alerts@example.com".into(),
            to_address: "oncall@example.com".into(),
            subject: DEFAULT_SUBJECT.into(),
            smtp_user: Some("alerts@example.com".into()),
            smtp_password: Some("app-password".into()),
        }
    }

    #[test]
    fn from_env_returns_none_without_smtp_host() {
        // Ensure SMTP_HOST is not set in the test environment.
        std::env::remove_var("SMTP_HOST");
        assert!(EmailConfig::from_env().is_none());
    }

    #[test]
    fn new_rejects_empty_host() {
        let cfg = EmailConfig {
            smtp_host: " ".into(),
            ..config()
        };
        assert_matches!(
            EmailDelivery::new(cfg).err(),
            Some(ChannelError::Configuration(_))
        );
    }

    #[test]
    fn new_rejects_missing_recipient() {
        let cfg = EmailConfig {
            to_address: String::new(),
            ..config()
        };
        let err = EmailDelivery::new(cfg).err().unwrap();
        assert!(err.to_string().contains("recipient address is empty"));
    }

    #[test]
    fn new_rejects_malformed_sender() {
        let cfg = EmailConfig {
            from_address: "not-an-email".into(),
            ..config()
        };
        let err = EmailDelivery::new(cfg).err().unwrap();
        assert!(err.to_string().contains("Invalid email sender address"));
    }

    #[test]
    fn new_rejects_user_without_password() {
        let cfg = EmailConfig {
            smtp_password: None,
            ..config()
        };
        assert_matches!(
            EmailDelivery::new(cfg).err(),
            Some(ChannelError::Configuration(_))
        );
    }

    #[test]
    fn email_error_display_build() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }
}
