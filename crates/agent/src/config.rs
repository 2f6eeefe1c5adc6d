use std::time::Duration;

use quakewatch_core::usgs::USGS_ALL_DAY_FEED_URL;
use quakewatch_core::{AlertThreshold, DEFAULT_MINIMUM_MAGNITUDE};

/// Default seconds between feed polls.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;

/// Default per-channel send timeout in seconds.
const DEFAULT_SEND_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Agent configuration loaded from environment variables.
///
/// Channel credentials are not part of this struct; each channel loads its
/// own config (see `quakewatch_events::{SmsConfig, EmailConfig}`).
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub feed_url: String,
    pub poll_interval: Duration,
    pub threshold: AlertThreshold,
    pub send_timeout: Duration,
    /// Suppress repeat alerts for records already alerted on.
    pub deduplicate: bool,
}

impl AgentConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default              |
    /// |-----------------------------|----------------------|
    /// | `FEED_URL`                  | USGS all-day summary |
    /// | `POLL_INTERVAL_SECS`        | `300`                |
    /// | `ALERT_MIN_MAGNITUDE`       | `6.5`                |
    /// | `CHANNEL_SEND_TIMEOUT_SECS` | `30`                 |
    /// | `ALERT_DEDUPLICATE`         | `true`               |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let feed_url = lookup("FEED_URL").unwrap_or_else(|| USGS_ALL_DAY_FEED_URL.to_string());

        let poll_interval_secs: u64 =
            parse_or(&lookup, "POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        if poll_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "POLL_INTERVAL_SECS",
                value: "0".into(),
                reason: "must be greater than zero".into(),
            });
        }

        let minimum_magnitude: f64 =
            parse_or(&lookup, "ALERT_MIN_MAGNITUDE", DEFAULT_MINIMUM_MAGNITUDE)?;
        let threshold =
            AlertThreshold::new(minimum_magnitude).map_err(|e| ConfigError::Invalid {
                var: "ALERT_MIN_MAGNITUDE",
                value: minimum_magnitude.to_string(),
                reason: e.to_string(),
            })?;

        let send_timeout_secs: u64 =
            parse_or(&lookup, "CHANNEL_SEND_TIMEOUT_SECS", DEFAULT_SEND_TIMEOUT_SECS)?;
        if send_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "CHANNEL_SEND_TIMEOUT_SECS",
                value: "0".into(),
                reason: "must be greater than zero".into(),
            });
        }

        let deduplicate = match lookup("ALERT_DEDUPLICATE") {
            None => true,
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::Invalid {
                var: "ALERT_DEDUPLICATE",
                value: raw.clone(),
                reason: "expected true/false".into(),
            })?,
        };

        Ok(Self {
            feed_url,
            poll_interval: Duration::from_secs(poll_interval_secs),
            threshold,
            send_timeout: Duration::from_secs(send_timeout_secs),
            deduplicate,
        })
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
