//! Alert message composition.

use crate::alert::AlertDecision;

/// Compose the default human-readable alert text for a decision.
///
/// ```text
/// 2 strong earthquakes detected with tsunami risk.
/// Check dashboard for live updates.
/// M7.4 - 18 km SSW of Hualien City, Taiwan (2024-04-02 23:58 UTC)
/// M6.6 - Offshore Hualien, Taiwan (2024-04-03 00:11 UTC)
/// ```
pub fn default_alert_message(decision: &AlertDecision) -> String {
    let mut text = format!(
        "{} strong earthquakes detected with tsunami risk.\nCheck dashboard for live updates.",
        decision.len()
    );

    for record in &decision.triggering_records {
        let magnitude = record
            .magnitude
            .map(|m| format!("{m:.1}"))
            .unwrap_or_else(|| "?".to_string());
        text.push_str(&format!(
            "\nM{magnitude} - {} ({} UTC)",
            record.place,
            record.observed_at.format("%Y-%m-%d %H:%M")
        ));
    }

    text
}
