//! Job posting identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::DomainError;

/// Query parameter carrying the selected posting on search/collection pages.
pub const CURRENT_JOB_ID_PARAM: &str = "currentJobId";

/// Canonical identifier of a job posting.
///
/// Two listings pointing at the same posting share the same `JobId`,
/// whichever URL shape they were extracted from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Extract a job id from a listing's navigable reference.
    ///
    /// The `currentJobId` query parameter wins when it is present and
    /// non-empty; otherwise a `/jobs/view/<id>` path yields `<id>`. Anything
    /// else, including strings that do not parse as absolute URLs, yields
    /// `None` and the listing is treated as not enrichable.
    pub fn from_href(href: &str) -> Option<Self> {
        let url = Url::parse(href).ok()?;

        let from_query = url
            .query_pairs()
            .find(|(key, _)| key.as_ref() == CURRENT_JOB_ID_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());
        if let Some(id) = from_query {
            return Some(Self(id));
        }

        let mut segments = url.path_segments()?;
        match (segments.next(), segments.next(), segments.next()) {
            (Some("jobs"), Some("view"), Some(id)) if !id.is_empty() => Some(Self(id.to_string())),
            _ => None,
        }
    }

    /// The posting's canonical resource urn, as the insights query expects it.
    pub fn posting_urn(&self) -> String {
        format!("urn:li:fsd_jobPosting:{}", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for JobId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for JobId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("JobId: empty"));
        }
        if trimmed.contains('/') {
            return Err(DomainError::invalid_id(format!("JobId: unexpected '/' in {trimmed:?}")));
        }
        Ok(Self(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(href: &str) -> Option<String> {
        JobId::from_href(href).map(|id| id.as_str().to_string())
    }

    #[test]
    fn view_path_without_query_param() {
        assert_eq!(
            extract("https://host/jobs/view/4211887733/?foo=bar").as_deref(),
            Some("4211887733")
        );
    }

    #[test]
    fn query_param_wins_over_path() {
        assert_eq!(
            extract("https://www.linkedin.com/jobs/view/111/?currentJobId=222").as_deref(),
            Some("222")
        );
        assert_eq!(
            extract("https://www.linkedin.com/jobs/search/?currentJobId=3999&keywords=rust").as_deref(),
            Some("3999")
        );
    }

    #[test]
    fn query_param_is_decoded() {
        assert_eq!(extract("https://host/jobs/collections/?currentJobId=a%2Bb").as_deref(), Some("a+b"));
    }

    #[test]
    fn empty_query_param_falls_back_to_path() {
        assert_eq!(extract("https://host/jobs/view/42?currentJobId=").as_deref(), Some("42"));
    }

    #[test]
    fn other_shapes_yield_none() {
        assert_eq!(extract("https://host/jobs/search/?keywords=rust"), None);
        assert_eq!(extract("https://host/jobs/view/"), None);
        assert_eq!(extract("https://host/company/view/123"), None);
        assert_eq!(extract("https://host/"), None);
        assert_eq!(extract("not a url"), None);
        assert_eq!(extract("/jobs/view/123"), None);
        assert_eq!(extract("mailto:someone@example.com"), None);
    }

    #[test]
    fn posting_urn_uses_fsd_namespace() {
        let id: JobId = "4211887733".parse().unwrap();
        assert_eq!(id.posting_urn(), "urn:li:fsd_jobPosting:4211887733");
    }

    #[test]
    fn from_str_rejects_empty_and_paths() {
        assert!("".parse::<JobId>().is_err());
        assert!("  ".parse::<JobId>().is_err());
        assert!("12/34".parse::<JobId>().is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: a `currentJobId` parameter is returned verbatim.
            #[test]
            fn current_job_id_returned_verbatim(
                id in "[A-Za-z0-9_-]{1,24}",
                path in "(/[a-z]{1,8}){0,3}/?"
            ) {
                let href = format!("https://www.linkedin.com{path}?currentJobId={id}&origin=JOBS_HOME");
                prop_assert_eq!(extract(&href), Some(id));
            }

            /// Property: `/jobs/view/<id>` without the parameter yields `<id>`.
            #[test]
            fn view_path_segment_returned(
                id in "[0-9]{1,12}",
                tail in "(/[a-z]{0,6})?",
                query in "(\\?[a-z]{1,5}=[a-z0-9]{0,5})?"
            ) {
                let href = format!("https://www.linkedin.com/jobs/view/{id}{tail}{query}");
                prop_assert_eq!(extract(&href), Some(id));
            }

            /// Property: paths that are not `/jobs/view/...` yield none.
            #[test]
            fn other_paths_yield_none(
                first in "[a-z]{1,8}",
                second in "[a-z]{1,8}",
                id in "[0-9]{1,12}"
            ) {
                prop_assume!(!(first == "jobs" && second == "view"));
                let href = format!("https://www.linkedin.com/{first}/{second}/{id}");
                prop_assert_eq!(extract(&href), None);
            }
        }
    }
}
