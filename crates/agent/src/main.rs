//! `quakewatch-agent` -- earthquake alert daemon.
//!
//! Polls an earthquake feed, and when a batch contains records at or above
//! the configured magnitude, sends an alert over every configured channel
//! (SMS, email, webhook). Runs until Ctrl-C.
//!
//! # Environment variables
//!
//! See `AgentConfig::from_env` for polling and threshold settings, and
//! `SmsConfig::from_env` / `EmailConfig::from_env` for channel credentials.
//! A channel whose primary variable is unset is simply not configured.

use std::sync::Arc;

use quakewatch_agent::config::AgentConfig;
use quakewatch_agent::feed::FeedClient;
use quakewatch_agent::monitor::Monitor;
use quakewatch_core::SeenRecordTracker;
use quakewatch_events::{
    ChannelError, EmailConfig, EmailDelivery, NotificationChannel, NotificationDispatcher,
    SmsConfig, SmsDelivery, WebhookDelivery,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quakewatch_agent=info,quakewatch_events=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AgentConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid agent configuration");
        std::process::exit(1);
    });

    let channels = build_channels().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid notification channel configuration");
        std::process::exit(1);
    });
    if channels.is_empty() {
        tracing::warn!("No notification channels configured; alerts will only be logged");
    }

    let feed = FeedClient::new(config.feed_url.clone()).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build feed client");
        std::process::exit(1);
    });

    let dispatcher = NotificationDispatcher::with_send_timeout(config.send_timeout);
    let mut monitor = Monitor::new(config.threshold, dispatcher, channels);
    if config.deduplicate {
        monitor = monitor.with_deduplication(SeenRecordTracker::default());
    }

    tracing::info!(
        feed_url = %config.feed_url,
        interval_secs = config.poll_interval.as_secs(),
        min_magnitude = config.threshold.minimum_magnitude,
        channels = monitor.channel_count(),
        deduplicate = config.deduplicate,
        "Starting quakewatch-agent",
    );

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                shutdown.cancel();
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
        }
    });

    monitor.run(&feed, config.poll_interval, cancel).await;
}

/// Construct every channel whose configuration is present.
///
/// Fails on the first channel that is present but misconfigured, so bad
/// credentials surface at startup rather than on the first alert.
fn build_channels() -> Result<Vec<Arc<dyn NotificationChannel>>, ChannelError> {
    let mut channels: Vec<Arc<dyn NotificationChannel>> = Vec::new();

    if let Some(config) = SmsConfig::from_env() {
        channels.push(Arc::new(SmsDelivery::new(config)?));
    }
    if let Some(config) = EmailConfig::from_env() {
        channels.push(Arc::new(EmailDelivery::new(config)?));
    }
    if let Some(webhook) = WebhookDelivery::from_env() {
        channels.push(Arc::new(webhook?));
    }

    for channel in &channels {
        tracing::info!(channel = channel.name(), "Notification channel configured");
    }

    Ok(channels)
}
