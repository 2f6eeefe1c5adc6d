//! USGS earthquake summary feed decoding.
//!
//! Decodes the GeoJSON `FeatureCollection` served under
//! `earthquake.usgs.gov/earthquakes/feed/v1.0/summary/` into
//! [`EventRecord`]s. Features that cannot be normalized are skipped rather
//! than failing the whole batch.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::CoreError;
use crate::event_record::EventRecord;

/// Daily summary of all earthquakes, the feed polled by default.
pub const USGS_ALL_DAY_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson";

/// Placeholder used when a feature carries no `place`.
pub const UNKNOWN_PLACE: &str = "Unknown location";

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    /// Kept raw so one badly typed feature cannot fail the whole document.
    #[serde(default)]
    features: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    id: Option<String>,
    properties: Properties,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    place: Option<String>,
    mag: Option<f64>,
    /// Milliseconds since the Unix epoch.
    time: i64,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// `[longitude, latitude, depth]`.
    coordinates: Vec<f64>,
}

/// Decode a feed document into records, in feed order.
///
/// Malformed JSON is an error; individual unusable features are dropped.
pub fn parse_feed(json: &str) -> Result<Vec<EventRecord>, CoreError> {
    let collection: FeatureCollection = serde_json::from_str(json)
        .map_err(|e| CoreError::Validation(format!("Invalid USGS feed document: {e}")))?;

    Ok(collection
        .features
        .into_iter()
        .filter_map(|raw| serde_json::from_value::<Feature>(raw).ok())
        .filter_map(into_record)
        .collect())
}

fn into_record(feature: Feature) -> Option<EventRecord> {
    let coordinates = feature.geometry?.coordinates;
    let (longitude, latitude) = match coordinates.as_slice() {
        [lon, lat, ..] => (*lon, *lat),
        _ => return None,
    };

    let observed_at = DateTime::<Utc>::from_timestamp_millis(feature.properties.time)?;
    let place = feature
        .properties
        .place
        .unwrap_or_else(|| UNKNOWN_PLACE.to_string());

    let record = EventRecord::new(
        place,
        feature.properties.mag,
        observed_at,
        longitude,
        latitude,
    )
    .ok()?;

    Some(match feature.id {
        Some(id) => record.with_id(id),
        None => record,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
