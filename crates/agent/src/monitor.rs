//! Polling cycle: fetch → evaluate → (de-duplicate) → dispatch.
//!
//! [`Monitor`] owns the only state carried across cycles: the optional
//! [`SeenRecordTracker`]. Everything else is recomputed per batch.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use quakewatch_core::message::default_alert_message;
use quakewatch_core::{evaluate, AlertThreshold, EventRecord, SeenRecordTracker};
use quakewatch_events::{DispatchReport, NotificationChannel, NotificationDispatcher};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::feed::RecordSource;

/// Evaluates record batches and dispatches alerts for qualifying ones.
pub struct Monitor {
    threshold: AlertThreshold,
    dispatcher: NotificationDispatcher,
    channels: Vec<Arc<dyn NotificationChannel>>,
    seen: Option<SeenRecordTracker>,
}

impl Monitor {
    /// Create a monitor that re-alerts on every qualifying batch.
    pub fn new(
        threshold: AlertThreshold,
        dispatcher: NotificationDispatcher,
        channels: Vec<Arc<dyn NotificationChannel>>,
    ) -> Self {
        Self {
            threshold,
            dispatcher,
            channels,
            seen: None,
        }
    }

    /// Suppress alerts for records `tracker` has already seen.
    pub fn with_deduplication(mut self, tracker: SeenRecordTracker) -> Self {
        self.seen = Some(tracker);
        self
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Run one cycle over an already-fetched batch.
    ///
    /// Returns `None` when nothing alert-worthy (or nothing new) was found,
    /// otherwise the report of the dispatch that was performed. With
    /// de-duplication enabled, records are remembered only when at least one
    /// channel delivered.
    pub async fn process_batch(&mut self, records: &[EventRecord]) -> Option<DispatchReport> {
        let mut decision = evaluate(records, &self.threshold);
        let now = Utc::now();

        if let Some(seen) = self.seen.as_ref() {
            let before = decision.len();
            decision = seen.unseen(decision, now);
            if decision.len() < before {
                tracing::debug!(
                    suppressed = before - decision.len(),
                    "Skipping records that were already alerted on"
                );
            }
        }

        if !decision.should_alert() {
            tracing::debug!(records = records.len(), "No alert-worthy records");
            return None;
        }

        tracing::warn!(
            count = decision.len(),
            threshold = self.threshold.minimum_magnitude,
            "High-magnitude earthquakes detected"
        );

        let report = self
            .dispatcher
            .dispatch(&decision, &self.channels, default_alert_message)
            .await;

        if report.all_delivered() {
            tracing::info!(report = %report, "Alert dispatched");
        } else {
            tracing::error!(report = %report, "Alert dispatched with failures");
        }

        // Remember only records that reached at least one channel.
        if let Some(seen) = self.seen.as_mut() {
            if report.delivered_count() > 0 || report.is_empty() {
                seen.mark_alerted(&decision.triggering_records, now);
            } else {
                tracing::warn!("No channel delivered the alert; will retry next cycle");
            }
        }

        Some(report)
    }

    /// Poll `source` every `interval` until `cancel` fires.
    ///
    /// A failed fetch is logged and the cycle skipped; the next tick retries.
    pub async fn run<S>(&mut self, source: &S, interval: Duration, cancel: CancellationToken)
    where
        S: RecordSource + ?Sized,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Monitor cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    match source.fetch().await {
                        Ok(records) => {
                            self.process_batch(&records).await;
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to fetch earthquake feed");
                        }
                    }
                }
            }
        }
    }
}
