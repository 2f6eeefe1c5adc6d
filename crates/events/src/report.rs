//! Per-channel outcome of one dispatch.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Result of a single channel's delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChannelOutcome {
    Delivered,
    Failed { reason: String },
}

impl ChannelOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl fmt::Display for ChannelOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delivered => f.write_str("delivered"),
            Self::Failed { reason } => write!(f, "failed ({reason})"),
        }
    }
}

/// Channel identifier → outcome, in channel registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DispatchReport {
    outcomes: IndexMap<String, ChannelOutcome>,
}

impl DispatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome. Returns `false` if `channel` was already present,
    /// in which case the earlier entry is kept.
    pub fn record(&mut self, channel: impl Into<String>, outcome: ChannelOutcome) -> bool {
        match self.outcomes.entry(channel.into()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(outcome);
                true
            }
        }
    }

    pub fn outcome(&self, channel: &str) -> Option<&ChannelOutcome> {
        self.outcomes.get(channel)
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.outcomes.contains_key(channel)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChannelOutcome)> {
        self.outcomes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn delivered_count(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_delivered()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.len() - self.delivered_count()
    }

    /// `true` when every channel delivered. Vacuously true for no channels.
    pub fn all_delivered(&self) -> bool {
        self.failed_count() == 0
    }
}

impl fmt::Display for DispatchReport {
    /// Renders `sms: failed (Authenticate); email: delivered`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("no channels configured");
        }
        for (i, (channel, outcome)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{channel}: {outcome}")?;
        }
        Ok(())
    }
}
