//! Alert policy: decides whether a batch of records warrants an alert.
//!
//! Pure logic. The caller fetches records and supplies the threshold.

use crate::alert::{AlertDecision, AlertThreshold};
use crate::event_record::EventRecord;

/// Evaluate a batch of records against the threshold.
///
/// A record qualifies iff its magnitude is present and at least
/// `threshold.minimum_magnitude`. Qualifying records keep their input order.
pub fn evaluate(records: &[EventRecord], threshold: &AlertThreshold) -> AlertDecision {
    let triggering_records = records
        .iter()
        .filter(|record| qualifies(record, threshold))
        .cloned()
        .collect();

    AlertDecision::new(triggering_records)
}

fn qualifies(record: &EventRecord, threshold: &AlertThreshold) -> bool {
    record
        .magnitude
        .is_some_and(|magnitude| threshold.is_met_by(magnitude))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn record(place: &str, magnitude: Option<f64>) -> EventRecord {
        EventRecord::new(
            place,
            magnitude,
            Utc.with_ymd_and_hms(2024, 1, 1, 7, 10, 0).unwrap(),
            137.2,
            37.5,
        )
        .unwrap()
    }

    fn threshold(value: f64) -> AlertThreshold {
        AlertThreshold::new(value).unwrap()
    }

    /// A mixed batch used by the property checks below.
    fn mixed_batch() -> Vec<EventRecord> {
        let magnitudes = [
            Some(2.1),
            None,
            Some(6.5),
            Some(7.4),
            Some(-0.3),
            Some(6.49),
            None,
            Some(8.8),
            Some(5.0),
            Some(6.5),
        ];
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        magnitudes
            .iter()
            .enumerate()
            .map(|(i, mag)| {
                EventRecord::new(
                    format!("site-{i}"),
                    *mag,
                    base + Duration::minutes(i as i64),
                    0.0,
                    0.0,
                )
                .unwrap()
                .with_id(format!("ev{i}"))
            })
            .collect()
    }

    #[test]
    fn one_strong_one_weak_alerts_on_strong_only() {
        let records = vec![record("X", Some(6.8)), record("Y", Some(5.1))];
        let decision = evaluate(&records, &threshold(6.5));

        assert!(decision.should_alert());
        assert_eq!(decision.triggering_records, vec![record("X", Some(6.8))]);
    }

    #[test]
    fn absent_magnitude_never_qualifies() {
        let records = vec![record("Z", None)];
        let decision = evaluate(&records, &threshold(6.5));
        assert!(!decision.should_alert());
        assert!(decision.triggering_records.is_empty());
    }

    #[test]
    fn magnitude_equal_to_threshold_qualifies() {
        let records = vec![record("W", Some(6.5))];
        let decision = evaluate(&records, &threshold(6.5));
        assert!(decision.should_alert());
        assert_eq!(decision.len(), 1);
    }

    #[test]
    fn empty_batch_does_not_alert() {
        let decision = evaluate(&[], &threshold(6.5));
        assert!(!decision.should_alert());
        assert!(decision.triggering_records.is_empty());
    }

    #[test]
    fn should_alert_matches_any_qualifying_record() {
        let batch = mixed_batch();
        for cutoff in [-1.0, 0.0, 5.0, 6.5, 6.51, 8.8, 8.81, 10.0] {
            let t = threshold(cutoff);
            let expected = batch
                .iter()
                .any(|r| r.magnitude.is_some_and(|m| m >= cutoff));
            assert_eq!(evaluate(&batch, &t).should_alert(), expected, "cutoff {cutoff}");
        }
    }

    #[test]
    fn triggering_records_are_the_ordered_qualifying_subset() {
        let batch = mixed_batch();
        for cutoff in [-1.0, 5.0, 6.5, 7.0, 9.0] {
            let decision = evaluate(&batch, &threshold(cutoff));

            for r in &decision.triggering_records {
                assert!(r.magnitude.unwrap() >= cutoff);
            }

            let expected: Vec<&EventRecord> = batch
                .iter()
                .filter(|r| r.magnitude.is_some_and(|m| m >= cutoff))
                .collect();
            let actual: Vec<&EventRecord> = decision.triggering_records.iter().collect();
            assert_eq!(actual, expected, "cutoff {cutoff}");
        }
    }

    #[test]
    fn evaluation_is_idempotent() {
        let batch = mixed_batch();
        let t = threshold(6.5);
        assert_eq!(evaluate(&batch, &t), evaluate(&batch, &t));
    }

    #[test]
    fn input_order_is_preserved_not_sorted_by_magnitude() {
        let records = vec![
            record("first", Some(6.6)),
            record("second", Some(9.0)),
            record("third", Some(7.0)),
        ];
        let decision = evaluate(&records, &threshold(6.5));
        let places: Vec<&str> = decision
            .triggering_records
            .iter()
            .map(|r| r.place.as_str())
            .collect();
        assert_eq!(places, ["first", "second", "third"]);
    }
}
