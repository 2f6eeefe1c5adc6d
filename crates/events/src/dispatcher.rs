//! Fan-out of one alert message to every configured channel.
//!
//! [`NotificationDispatcher::dispatch`] composes the message once, sends it
//! on all channels concurrently, waits for every attempt to finish, and
//! folds each result into a [`DispatchReport`]. A channel failure, timeout or
//! panic never escapes the call and never affects the other channels.
//!
//! Deciding *whether* to alert is the caller's job: only dispatch a
//! decision for which [`AlertDecision::should_alert`] is `true`.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use futures::FutureExt;
use quakewatch_core::AlertDecision;

use crate::delivery::{ChannelError, NotificationChannel};
use crate::report::{ChannelOutcome, DispatchReport};

/// Failure reason recorded for a channel whose `send` panicked.
pub const PANICKED_REASON: &str = "channel panicked";

/// Sends alert messages through a set of channels.
#[derive(Debug, Clone, Default)]
pub struct NotificationDispatcher {
    send_timeout: Option<Duration>,
}

impl NotificationDispatcher {
    /// Dispatcher without a per-channel timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound each channel's send by `timeout`; a send that exceeds it is
    /// reported as failed.
    pub fn with_send_timeout(timeout: Duration) -> Self {
        Self {
            send_timeout: Some(timeout),
        }
    }

    /// Deliver `template(decision)` to every channel exactly once.
    ///
    /// Channels sharing an identifier are all attempted; the second and later
    /// ones are reported as `name#2`, `name#3`, ...
    pub async fn dispatch<F>(
        &self,
        decision: &AlertDecision,
        channels: &[Arc<dyn NotificationChannel>],
        template: F,
    ) -> DispatchReport
    where
        F: Fn(&AlertDecision) -> String,
    {
        let message = template(decision);

        let attempts = channels.iter().map(|channel| {
            let message = message.as_str();
            async move {
                AssertUnwindSafe(self.attempt(channel.as_ref(), message))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| {
                        tracing::error!(channel = channel.name(), "Channel panicked during send");
                        ChannelOutcome::Failed {
                            reason: PANICKED_REASON.to_string(),
                        }
                    })
            }
        });
        let outcomes = join_all(attempts).await;

        let mut report = DispatchReport::new();
        for (channel, outcome) in channels.iter().zip(outcomes) {
            let name = channel.name();
            if report.record(name, outcome.clone()) {
                continue;
            }
            let key = (2..)
                .map(|n| format!("{name}#{n}"))
                .find(|candidate| !report.contains(candidate))
                .unwrap_or_else(|| name.to_string());
            tracing::warn!(channel = name, key = %key, "Duplicate channel identifier");
            report.record(key, outcome);
        }

        tracing::info!(
            records = decision.len(),
            delivered = report.delivered_count(),
            failed = report.failed_count(),
            "Alert dispatch finished"
        );

        report
    }

    /// Run one send and convert its result into an outcome.
    async fn attempt(&self, channel: &dyn NotificationChannel, message: &str) -> ChannelOutcome {
        let result = match self.send_timeout {
            Some(limit) => match tokio::time::timeout(limit, channel.send(message)).await {
                Ok(result) => result,
                Err(_) => Err(ChannelError::Other(format!(
                    "timed out after {}s",
                    limit.as_secs_f64()
                ))),
            },
            None => channel.send(message).await,
        };

        match result {
            Ok(()) => {
                tracing::info!(channel = channel.name(), "Alert delivered");
                ChannelOutcome::Delivered
            }
            Err(e) => {
                tracing::warn!(channel = channel.name(), error = %e, "Alert delivery failed");
                ChannelOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
