//! Indicator rendering.
//!
//! Rendering is a pure function of the metrics record, the threshold and the
//! current time. Hosts turn the resulting [`IndicatorView`] into elements.

use chrono::{DateTime, Utc};
use serde::Serialize;

use jobpulse_core::{MetricsRecord, Threshold};

use crate::document::IndicatorMark;

/// Visual treatment of a badge.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Placeholder while the fetch is outstanding.
    Pending,
    BelowThreshold,
    AboveThreshold,
    /// Neutral tone of the view count.
    Views,
    /// Applicant count the service did not report.
    Unknown,
    /// Listed at most one day ago.
    Fresh,
    /// Listed more than one and at most seven days ago.
    Recent,
    /// Listed more than seven days ago.
    Stale,
    /// No listing date reported.
    New,
    /// The "unavailable" sentinel.
    Muted,
}

/// Sub-element slot of an indicator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeRole {
    Applicants,
    Views,
    Age,
    Status,
}

impl BadgeRole {
    pub fn class_name(&self) -> &'static str {
        match self {
            BadgeRole::Applicants => "applicant-count",
            BadgeRole::Views => "view-count",
            BadgeRole::Age => "listing-date",
            BadgeRole::Status => "metrics-status",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub role: BadgeRole,
    pub text: String,
    pub tone: Tone,
}

impl Badge {
    fn new(role: BadgeRole, text: impl Into<String>, tone: Tone) -> Self {
        Self {
            role,
            text: text.into(),
            tone,
        }
    }
}

/// Content of one indicator element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorView {
    mark: IndicatorMark,
    badges: Vec<Badge>,
}

pub const UNAVAILABLE_TEXT: &str = "Details unavailable";

impl IndicatorView {
    /// Placeholder attached as soon as an entry is discovered.
    pub fn pending() -> Self {
        Self {
            mark: IndicatorMark::Pending,
            badges: vec![
                Badge::new(BadgeRole::Applicants, "Fetching...", Tone::Pending),
                Badge::new(BadgeRole::Views, "Fetching...", Tone::Pending),
                Badge::new(BadgeRole::Age, "Checking...", Tone::Pending),
            ],
        }
    }

    /// Single muted sentinel shown when the fetch produced nothing.
    pub fn unavailable() -> Self {
        Self {
            mark: IndicatorMark::Failed,
            badges: vec![Badge::new(BadgeRole::Status, UNAVAILABLE_TEXT, Tone::Muted)],
        }
    }

    pub fn mark(&self) -> IndicatorMark {
        self.mark
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn badge(&self, role: BadgeRole) -> Option<&Badge> {
        self.badges.iter().find(|b| b.role == role)
    }

    /// One-line summary, e.g. `250 applicants · 1000 views · 2d ago`.
    pub fn summary(&self) -> String {
        self.badges
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join(" · ")
    }
}

/// Age classification of a listing, in whole days.
pub fn age_tone(days_ago: i64) -> Tone {
    if days_ago <= 1 {
        Tone::Fresh
    } else if days_ago <= 7 {
        Tone::Recent
    } else {
        Tone::Stale
    }
}

pub fn applicant_badge(count: Option<u64>, threshold: Threshold) -> Badge {
    match count {
        Some(count) => {
            let tone = if threshold.is_below(count) {
                Tone::BelowThreshold
            } else {
                Tone::AboveThreshold
            };
            Badge::new(BadgeRole::Applicants, format!("{count} applicants"), tone)
        }
        None => Badge::new(BadgeRole::Applicants, "? applicants", Tone::Unknown),
    }
}

pub fn views_badge(views: u64) -> Badge {
    Badge::new(BadgeRole::Views, format!("{views} views"), Tone::Views)
}

pub fn age_badge(days_ago: Option<i64>) -> Badge {
    match days_ago {
        Some(days) => Badge::new(BadgeRole::Age, format!("{days}d ago"), age_tone(days)),
        None => Badge::new(BadgeRole::Age, "New", Tone::New),
    }
}

/// Render a fetched record against the threshold.
pub fn render(record: &MetricsRecord, threshold: Threshold, now: DateTime<Utc>) -> IndicatorView {
    IndicatorView {
        mark: IndicatorMark::Enriched,
        badges: vec![
            applicant_badge(record.applicant_count, threshold),
            views_badge(record.view_count),
            age_badge(record.days_listed(now)),
        ],
    }
}

/// Render a fetch outcome; `None` yields the unavailable sentinel.
pub fn render_outcome(
    outcome: Option<&MetricsRecord>,
    threshold: Threshold,
    now: DateTime<Utc>,
) -> IndicatorView {
    match outcome {
        Some(record) => render(record, threshold, now),
        None => IndicatorView::unavailable(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn threshold(n: u64) -> Threshold {
        Threshold::new(n).unwrap()
    }

    #[test]
    fn scenario_below_threshold_and_recent() {
        let now = Utc::now();
        let record = MetricsRecord::new(Some(250), 1000, Some(now - Duration::days(2)));

        let view = render(&record, threshold(300), now);

        assert_eq!(view.mark(), IndicatorMark::Enriched);
        let applicants = view.badge(BadgeRole::Applicants).unwrap();
        assert_eq!(applicants.text, "250 applicants");
        assert_eq!(applicants.tone, Tone::BelowThreshold);

        let views = view.badge(BadgeRole::Views).unwrap();
        assert_eq!(views.text, "1000 views");
        assert_eq!(views.tone, Tone::Views);

        let age = view.badge(BadgeRole::Age).unwrap();
        assert_eq!(age.text, "2d ago");
        assert_eq!(age.tone, Tone::Recent);

        assert_eq!(view.summary(), "250 applicants · 1000 views · 2d ago");
    }

    #[test]
    fn count_equal_to_threshold_is_above() {
        let badge = applicant_badge(Some(300), threshold(300));
        assert_eq!(badge.tone, Tone::AboveThreshold);
    }

    #[test]
    fn missing_listing_date_is_new() {
        let record = MetricsRecord::new(Some(1), 0, None);
        let view = render(&record, threshold(300), Utc::now());
        let age = view.badge(BadgeRole::Age).unwrap();
        assert_eq!(age.text, "New");
        assert_eq!(age.tone, Tone::New);
    }

    #[test]
    fn unknown_applicant_count_is_neutral() {
        let badge = applicant_badge(None, threshold(1));
        assert_eq!(badge.text, "? applicants");
        assert_eq!(badge.tone, Tone::Unknown);
    }

    #[test]
    fn age_bucket_edges() {
        assert_eq!(age_tone(-1), Tone::Fresh);
        assert_eq!(age_tone(0), Tone::Fresh);
        assert_eq!(age_tone(1), Tone::Fresh);
        assert_eq!(age_tone(2), Tone::Recent);
        assert_eq!(age_tone(7), Tone::Recent);
        assert_eq!(age_tone(8), Tone::Stale);
    }

    #[test]
    fn failed_outcome_is_single_sentinel() {
        let view = render_outcome(None, threshold(300), Utc::now());
        assert_eq!(view.mark(), IndicatorMark::Failed);
        assert_eq!(view.badges().len(), 1);
        assert_eq!(view.badges()[0].text, UNAVAILABLE_TEXT);
        assert_eq!(view.badges()[0].tone, Tone::Muted);
        assert!(view.badge(BadgeRole::Applicants).is_none());
    }

    #[test]
    fn pending_has_placeholders() {
        let view = IndicatorView::pending();
        assert_eq!(view.mark(), IndicatorMark::Pending);
        assert_eq!(view.summary(), "Fetching... · Fetching... · Checking...");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: below-threshold style iff count < threshold.
            #[test]
            fn threshold_is_strict(count in 0u64..10_000, limit in 1u64..10_000) {
                let badge = applicant_badge(Some(count), threshold(limit));
                prop_assert_eq!(badge.tone == Tone::BelowThreshold, count < limit);
                prop_assert_eq!(badge.text, format!("{count} applicants"));
            }

            /// Property: age buckets follow whole elapsed days.
            #[test]
            fn age_buckets_follow_days(minutes in 0i64..(60 * 24 * 60)) {
                let now = Utc::now();
                let record = MetricsRecord::new(Some(1), 1, Some(now - Duration::minutes(minutes)));
                let view = render(&record, threshold(5), now);
                let age = view.badge(BadgeRole::Age).unwrap();

                let days = minutes / (60 * 24);
                let expected = if days <= 1 {
                    Tone::Fresh
                } else if days <= 7 {
                    Tone::Recent
                } else {
                    Tone::Stale
                };
                prop_assert_eq!(age.tone, expected);
                prop_assert_eq!(&age.text, &format!("{days}d ago"));
            }

            /// Property: rendering is a pure function of its inputs.
            #[test]
            fn render_is_deterministic(
                count in proptest::option::of(0u64..5_000),
                views in 0u64..1_000_000,
                limit in 1u64..5_000
            ) {
                let now = Utc::now();
                let record = MetricsRecord::new(count, views, None);
                prop_assert_eq!(
                    render(&record, threshold(limit), now),
                    render(&record, threshold(limit), now)
                );
            }
        }
    }
}
