//! Alert configuration and the outcome of evaluating a record batch.

use serde::Serialize;

use crate::error::CoreError;
use crate::event_record::EventRecord;
use crate::threshold_validation::validate_finite;

/// Default minimum magnitude treated as carrying tsunami risk.
pub const DEFAULT_MINIMUM_MAGNITUDE: f64 = 6.5;

/// Magnitude cutoff at or above which a record is alert-worthy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlertThreshold {
    pub minimum_magnitude: f64,
}

impl AlertThreshold {
    /// Create a threshold, rejecting NaN and infinite cutoffs.
    pub fn new(minimum_magnitude: f64) -> Result<Self, CoreError> {
        validate_finite(minimum_magnitude, "minimum_magnitude")?;
        Ok(Self { minimum_magnitude })
    }

    /// Whether `magnitude` meets the cutoff (inclusive).
    pub fn is_met_by(&self, magnitude: f64) -> bool {
        magnitude >= self.minimum_magnitude
    }
}

impl Default for AlertThreshold {
    fn default() -> Self {
        Self {
            minimum_magnitude: DEFAULT_MINIMUM_MAGNITUDE,
        }
    }
}

/// Result of evaluating a batch of records against an [`AlertThreshold`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertDecision {
    /// Qualifying records, in input order.
    pub triggering_records: Vec<EventRecord>,
}

impl AlertDecision {
    pub fn new(triggering_records: Vec<EventRecord>) -> Self {
        Self { triggering_records }
    }

    /// `true` iff at least one record qualified.
    pub fn should_alert(&self) -> bool {
        !self.triggering_records.is_empty()
    }

    /// Number of qualifying records.
    pub fn len(&self) -> usize {
        self.triggering_records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggering_records.is_empty()
    }
}
