//! Wire shapes of the two metadata calls.
//!
//! Every field is optional on the wire; missing values default rather than
//! fail (counts to 0, the listing date to none).

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// JSON pointer to the applicant count inside the insights response.
pub const APPLICANT_COUNT_POINTER: &str = "/data/jobsDashJobPostingDetailSectionsByCardSectionTypes/elements/0/jobPostingDetailSection/0/jobApplicantInsightsUrn/applicantCount";

/// Card section requested from the insights query.
pub const APPLICANT_INSIGHTS_SECTION: &str = "JOB_APPLICANT_INSIGHTS";

/// Body of the details call.
///
/// `data` is kept loose and read field by field, so one malformed field
/// defaults instead of failing the whole body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailsResponse {
    #[serde(default)]
    pub data: Value,
}

impl DetailsResponse {
    /// View count; fractions are truncated, anything non-numeric is 0.
    pub fn views(&self) -> u64 {
        self.data
            .get("views")
            .and_then(Value::as_f64)
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n.trunc() as u64)
            .unwrap_or(0)
    }

    /// Listing date from epoch milliseconds. A zero, non-integer or
    /// out-of-range value counts as "not reported".
    pub fn original_listed_at(&self) -> Option<DateTime<Utc>> {
        self.data
            .get("originalListedAt")
            .and_then(Value::as_i64)
            .filter(|ms| *ms != 0)
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    }
}

/// Applicant count from an insights body; any missing segment yields 0.
pub fn applicant_count(body: &Value) -> u64 {
    body.pointer(APPLICANT_COUNT_POINTER)
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

/// The URL-encoded `variables` block of the insights query.
pub fn insights_variables(posting_urn: &str) -> String {
    format!(
        "(cardSectionTypes:List({APPLICANT_INSIGHTS_SECTION}),jobPostingUrn:{},includeSecondaryActionsV2:true)",
        urlencoding::encode(posting_urn)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn details_defaults_missing_fields() {
        let body: DetailsResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(body.views(), 0);
        assert_eq!(body.original_listed_at(), None);

        let body: DetailsResponse = serde_json::from_value(json!({ "data": {} })).unwrap();
        assert_eq!(body.views(), 0);
        assert_eq!(body.original_listed_at(), None);
    }

    #[test]
    fn details_reads_views_and_listing_date() {
        let body: DetailsResponse = serde_json::from_value(json!({
            "data": { "views": 1000, "originalListedAt": 1_700_000_000_000i64, "title": "ignored" },
            "included": []
        }))
        .unwrap();
        assert_eq!(body.views(), 1000);
        assert_eq!(
            body.original_listed_at().map(|t| t.timestamp_millis()),
            Some(1_700_000_000_000)
        );
    }

    #[test]
    fn zero_listing_date_is_absent() {
        let body: DetailsResponse =
            serde_json::from_value(json!({ "data": { "originalListedAt": 0 } })).unwrap();
        assert_eq!(body.original_listed_at(), None);
    }

    #[test]
    fn mistyped_detail_fields_default_individually() {
        let body: DetailsResponse = serde_json::from_value(json!({
            "data": { "views": 12.0, "originalListedAt": "2024-01-01" }
        }))
        .unwrap();
        assert_eq!(body.views(), 12);
        assert_eq!(body.original_listed_at(), None);

        let body: DetailsResponse = serde_json::from_value(json!({
            "data": { "views": "many", "originalListedAt": 1_700_000_000_000i64 }
        }))
        .unwrap();
        assert_eq!(body.views(), 0);
        assert!(body.original_listed_at().is_some());

        let body: DetailsResponse = serde_json::from_value(json!({ "data": null })).unwrap();
        assert_eq!(body.views(), 0);
    }

    #[test]
    fn fractional_views_truncate() {
        let body: DetailsResponse =
            serde_json::from_value(json!({ "data": { "views": 99.9 } })).unwrap();
        assert_eq!(body.views(), 99);

        let body: DetailsResponse =
            serde_json::from_value(json!({ "data": { "views": -3 } })).unwrap();
        assert_eq!(body.views(), 0);
    }

    #[test]
    fn applicant_count_by_path() {
        let body = json!({
            "data": {
                "jobsDashJobPostingDetailSectionsByCardSectionTypes": {
                    "elements": [{
                        "jobPostingDetailSection": [{
                            "jobApplicantInsightsUrn": { "applicantCount": 87 }
                        }]
                    }]
                }
            }
        });
        assert_eq!(applicant_count(&body), 87);
    }

    #[test]
    fn applicant_count_missing_segments_default_to_zero() {
        assert_eq!(applicant_count(&json!({})), 0);
        assert_eq!(applicant_count(&json!({ "data": null })), 0);
        assert_eq!(
            applicant_count(&json!({
                "data": { "jobsDashJobPostingDetailSectionsByCardSectionTypes": { "elements": [] } }
            })),
            0
        );
    }

    #[test]
    fn variables_encode_the_urn() {
        assert_eq!(
            insights_variables("urn:li:fsd_jobPosting:42"),
            "(cardSectionTypes:List(JOB_APPLICANT_INSIGHTS),jobPostingUrn:urn%3Ali%3Afsd_jobPosting%3A42,includeSecondaryActionsV2:true)"
        );
    }
}
