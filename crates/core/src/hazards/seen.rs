//! Suppression of repeat alerts for records that were already alerted on.
//!
//! Feeds such as the USGS daily summary return the same strong earthquake on
//! every poll. [`SeenRecordTracker`] remembers which records have already
//! been alerted on so the caller can drop them before dispatching again.
//! Filtering and remembering are separate steps: a record only counts as
//! alerted once the caller has committed it with `mark_alerted`.

use std::collections::{HashMap, HashSet};

use chrono::Duration;

use crate::alert::AlertDecision;
use crate::event_record::EventRecord;
use crate::types::Timestamp;

/// Default retention: twice the span of a daily summary feed.
pub const DEFAULT_RETENTION_HOURS: i64 = 48;

/// Remembers record keys (see [`EventRecord::key`](crate::EventRecord::key))
/// together with when they were first alerted on.
#[derive(Debug)]
pub struct SeenRecordTracker {
    retention: Duration,
    first_alerted: HashMap<String, Timestamp>,
}

impl SeenRecordTracker {
    /// Create an empty tracker that forgets keys after `retention`.
    pub fn new(retention: Duration) -> Self {
        Self {
            retention,
            first_alerted: HashMap::new(),
        }
    }

    /// Number of keys currently remembered.
    pub fn len(&self) -> usize {
        self.first_alerted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first_alerted.is_empty()
    }

    /// Drop records from `decision` that were alerted on within the
    /// retention window before `now`. Does not remember anything; call
    /// [`mark_alerted`](Self::mark_alerted) once the alert actually went out.
    ///
    /// Repeats of the same record within one batch collapse to the first.
    pub fn unseen(&self, decision: AlertDecision, now: Timestamp) -> AlertDecision {
        let cutoff = now - self.retention;
        let mut batch_keys = HashSet::new();

        let fresh = decision
            .triggering_records
            .into_iter()
            .filter(|record| {
                let key = record.key();
                let seen = self
                    .first_alerted
                    .get(&key)
                    .is_some_and(|alerted_at| *alerted_at >= cutoff);
                !seen && batch_keys.insert(key)
            })
            .collect();

        AlertDecision::new(fresh)
    }

    /// Remember `records` as alerted on at `now`.
    ///
    /// Entries older than the retention window are forgotten first, so memory
    /// stays bounded by the feed volume within the window. A key that is
    /// still remembered keeps its original alert time.
    pub fn mark_alerted(&mut self, records: &[EventRecord], now: Timestamp) {
        self.prune(now);
        for record in records {
            self.first_alerted.entry(record.key()).or_insert(now);
        }
    }

    fn prune(&mut self, now: Timestamp) {
        let cutoff = now - self.retention;
        self.first_alerted.retain(|_, alerted_at| *alerted_at >= cutoff);
    }
}

impl Default for SeenRecordTracker {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_RETENTION_HOURS))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
