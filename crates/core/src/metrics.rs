//! Derived engagement metrics for a single posting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metrics fetched once per posting and rendered against a threshold.
///
/// `applicant_count` is `None` when the applicant-insights call degraded while
/// the fetch as a whole still succeeded. `original_listed_at` is `None` when
/// the service did not report a listing date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRecord {
    pub applicant_count: Option<u64>,
    pub view_count: u64,
    pub original_listed_at: Option<DateTime<Utc>>,
}

impl MetricsRecord {
    pub fn new(
        applicant_count: Option<u64>,
        view_count: u64,
        original_listed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            applicant_count,
            view_count,
            original_listed_at,
        }
    }

    /// Whole days elapsed since the original listing, floored.
    ///
    /// Timestamps in the future produce negative values.
    pub fn days_listed(&self, now: DateTime<Utc>) -> Option<i64> {
        let listed = self.original_listed_at?;
        let elapsed_ms = now.signed_duration_since(listed).num_milliseconds();
        Some(elapsed_ms.div_euclid(MILLIS_PER_DAY))
    }
}

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn listed(ago: Duration) -> (MetricsRecord, DateTime<Utc>) {
        let now = Utc::now();
        (MetricsRecord::new(Some(1), 1, Some(now - ago)), now)
    }

    #[test]
    fn days_are_floored() {
        let (record, now) = listed(Duration::hours(47));
        assert_eq!(record.days_listed(now), Some(1));

        let (record, now) = listed(Duration::hours(48));
        assert_eq!(record.days_listed(now), Some(2));

        let (record, now) = listed(Duration::minutes(5));
        assert_eq!(record.days_listed(now), Some(0));
    }

    #[test]
    fn future_listing_is_negative() {
        let (record, now) = listed(Duration::hours(-3));
        assert_eq!(record.days_listed(now), Some(-1));
    }

    #[test]
    fn missing_listing_date_has_no_age() {
        let record = MetricsRecord::new(None, 0, None);
        assert_eq!(record.days_listed(Utc::now()), None);
    }

    #[test]
    fn serializes_in_camel_case() {
        let record = MetricsRecord::new(Some(250), 1000, None);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "applicantCount": 250,
                "viewCount": 1000,
                "originalListedAt": null,
            })
        );
    }
}
