//! Normalized hazard observation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::threshold_validation::{validate_finite, validate_range};
use crate::types::Timestamp;

/// One earthquake observation, normalized from whatever feed produced it.
///
/// Constructed via [`EventRecord::new`], which enforces that a present
/// magnitude is finite. Magnitudes are never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Feed-assigned identifier, when the source provides one.
    pub id: Option<String>,
    /// Human-readable location, e.g. `"10 km SSW of Hualien City, Taiwan"`.
    pub place: String,
    /// Severity measure; `None` when the feed has not assigned one yet.
    pub magnitude: Option<f64>,
    /// When the event occurred (UTC).
    pub observed_at: Timestamp,
    pub longitude: f64,
    pub latitude: f64,
}

impl EventRecord {
    /// Create a record without a feed identifier.
    ///
    /// Rejects a non-finite magnitude and coordinates outside WGS84 bounds.
    pub fn new(
        place: impl Into<String>,
        magnitude: Option<f64>,
        observed_at: Timestamp,
        longitude: f64,
        latitude: f64,
    ) -> Result<Self, CoreError> {
        if let Some(mag) = magnitude {
            validate_finite(mag, "magnitude")?;
        }
        validate_range(longitude, -180.0, 180.0, "longitude")?;
        validate_range(latitude, -90.0, 90.0, "latitude")?;
        Ok(Self {
            id: None,
            place: place.into(),
            magnitude,
            observed_at,
            longitude,
            latitude,
        })
    }

    /// Attach the feed identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Stable identity used to recognise the same observation across polls.
    ///
    /// Prefers the feed id; falls back to place plus timestamp.
    pub fn key(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("{}@{}", self.place, self.observed_at.timestamp_millis()),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 4, 2, 23, 58, 11).unwrap()
    }

    #[test]
    fn new_keeps_magnitude_unclamped() {
        let record = EventRecord::new("Offshore", Some(9.9), at(), 121.6, 23.8).unwrap();
        assert_eq!(record.magnitude, Some(9.9));

        let negative = EventRecord::new("Nevada", Some(-0.4), at(), -117.1, 38.2).unwrap();
        assert_eq!(negative.magnitude, Some(-0.4));
    }

    #[test]
    fn new_accepts_absent_magnitude() {
        let record = EventRecord::new("Unknown", None, at(), 0.0, 0.0).unwrap();
        assert!(record.magnitude.is_none());
        assert!(record.id.is_none());
    }

    #[test]
    fn new_rejects_non_finite_magnitude() {
        assert_matches!(
            EventRecord::new("X", Some(f64::NAN), at(), 0.0, 0.0),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            EventRecord::new("X", Some(f64::INFINITY), at(), 0.0, 0.0),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn new_rejects_out_of_range_coordinates() {
        assert_matches!(
            EventRecord::new("X", Some(5.0), at(), 181.0, 0.0),
            Err(CoreError::Validation(msg)) if msg.contains("longitude")
        );
        assert_matches!(
            EventRecord::new("X", Some(5.0), at(), 0.0, -90.5),
            Err(CoreError::Validation(msg)) if msg.contains("latitude")
        );
    }

    #[test]
    fn key_prefers_feed_id() {
        let record = EventRecord::new("X", Some(7.0), at(), 0.0, 0.0)
            .unwrap()
            .with_id("us7000m9g4");
        assert_eq!(record.key(), "us7000m9g4");
    }

    #[test]
    fn key_falls_back_to_place_and_time() {
        let record = EventRecord::new("X", Some(7.0), at(), 0.0, 0.0).unwrap();
        assert_eq!(record.key(), format!("X@{}", at().timestamp_millis()));
    }
}
