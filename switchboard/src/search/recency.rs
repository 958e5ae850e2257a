//! Time-decay multipliers for content recency.
//!
//! Support documentation (features, pricing, policy) changes faster than it
//! is re-indexed, so older chunks are systematically discounted rather than
//! excluded: a stale chunk may still be the only available answer.

use chrono::{DateTime, NaiveDate, Utc};

/// Metadata keys probed, in order, for a content timestamp.
const TIMESTAMP_KEYS: &[&str] = &[
    "published_at",
    "updated_at",
    "timestamp",
    "date",
    "scraped_at",
];

/// Compute the recency multiplier for a content timestamp.
///
/// `now` is injected rather than read from the clock so the policy is
/// testable; the engine passes `Utc::now()`.
///
/// Policy by age in days:
/// - missing timestamp: 1.0 (neutral)
/// - under 30: 1.5
/// - 30 to 90: 1.3
/// - 90 to 180: 1.1
/// - 180 to 365: 1.0
/// - 365 and beyond: linear decay `1.0 - (age/365 - 1) * 0.25`, floored
///   at 0.5
pub fn boost(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f32 {
    let Some(timestamp) = timestamp else {
        return 1.0;
    };

    let age_days = (now - timestamp).num_seconds() as f32 / 86_400.0;

    if age_days < 30.0 {
        1.5
    } else if age_days < 90.0 {
        1.3
    } else if age_days < 180.0 {
        1.1
    } else if age_days < 365.0 {
        1.0
    } else {
        (1.0 - (age_days / 365.0 - 1.0) * 0.25).max(0.5)
    }
}

/// Pull a content timestamp out of index metadata.
///
/// Probes the well-known keys in [`TIMESTAMP_KEYS`] and accepts RFC 3339
/// strings or bare `YYYY-MM-DD` dates. Anything unparseable is treated as
/// missing, never as an error.
pub fn timestamp_from_metadata(metadata: &serde_json::Value) -> Option<DateTime<Utc>> {
    let object = metadata.as_object()?;

    for key in TIMESTAMP_KEYS {
        if let Some(raw) = object.get(*key).and_then(|v| v.as_str()) {
            if let Some(parsed) = parse_timestamp(raw) {
                return Some(parsed);
            }
        }
    }

    None
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn days_ago(now: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
        Some(now - Duration::days(days))
    }

    #[test]
    fn missing_timestamp_is_neutral() {
        assert_eq!(boost(None, Utc::now()), 1.0);
    }

    #[test]
    fn tier_boundaries() {
        let now = Utc::now();
        assert_eq!(boost(days_ago(now, 10), now), 1.5);
        assert_eq!(boost(days_ago(now, 45), now), 1.3);
        assert_eq!(boost(days_ago(now, 120), now), 1.1);
        assert_eq!(boost(days_ago(now, 200), now), 1.0);
    }

    #[test]
    fn old_content_decays_linearly_with_floor() {
        let now = Utc::now();
        // 1.5 years: 1.0 - 0.5 * 0.25 = 0.875
        let eighteen_months = boost(days_ago(now, 547), now);
        assert!((eighteen_months - 0.875).abs() < 0.01);
        // Far past the floor.
        assert_eq!(boost(days_ago(now, 3650), now), 0.5);
    }

    #[test]
    fn younger_content_never_scores_below_older() {
        let now = Utc::now();
        let ages = [1_i64, 29, 31, 89, 91, 179, 181, 364, 366, 800, 4000];
        let boosts: Vec<f32> = ages
            .iter()
            .map(|&days| boost(days_ago(now, days), now))
            .collect();
        for pair in boosts.windows(2) {
            assert!(pair[0] >= pair[1], "boost increased with age: {boosts:?}");
        }
    }

    #[test]
    fn metadata_timestamps_parse_or_degrade_to_missing() {
        let rfc3339 = serde_json::json!({ "published_at": "2024-03-01T12:00:00Z" });
        assert!(timestamp_from_metadata(&rfc3339).is_some());

        let bare_date = serde_json::json!({ "date": "2024-03-01" });
        assert!(timestamp_from_metadata(&bare_date).is_some());

        let garbage = serde_json::json!({ "published_at": "last tuesday" });
        assert!(timestamp_from_metadata(&garbage).is_none());

        assert!(timestamp_from_metadata(&serde_json::Value::Null).is_none());
    }

    #[test]
    fn later_keys_are_probed_when_earlier_ones_fail() {
        let mixed = serde_json::json!({
            "published_at": "not a date",
            "updated_at": "2023-11-20"
        });
        assert!(timestamp_from_metadata(&mixed).is_some());
    }
}
