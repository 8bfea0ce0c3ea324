//! Remote metrics client configuration.

use std::time::Duration;

use url::Url;

use crate::error::ClientError;

/// Production origin of the metadata service.
pub const DEFAULT_BASE_URL: &str = "https://www.linkedin.com";

/// Persisted query backing the applicant-insights call.
pub const DEFAULT_QUERY_ID: &str =
    "voyagerJobsDashJobPostingDetailSections.c07b0d44515bceba51a9b73c01b0cecb";

/// Versioned normalized format requested by the details call.
pub const NORMALIZED_ACCEPT: &str = "application/vnd.linkedin.normalized+json+2.1";

pub const ENV_BASE_URL: &str = "JOBPULSE_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "JOBPULSE_TIMEOUT_MS";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service origin, without a trailing slash.
    pub base_url: String,
    /// Query identifier for the insights call.
    pub query_id: String,
    /// Per-request timeout; an expired request fails the whole fetch.
    pub request_timeout: Duration,
    pub accept_language: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            query_id: DEFAULT_QUERY_ID.to_string(),
            request_timeout: Duration::from_secs(15),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `JOBPULSE_BASE_URL` / `JOBPULSE_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, ClientError> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            config = config.with_base_url(base_url)?;
        }

        if let Ok(raw) = std::env::var(ENV_TIMEOUT_MS) {
            let ms = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ClientError::InvalidEnv(ENV_TIMEOUT_MS, e.to_string()))?;
            config.request_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Point the client at another origin (e.g. a local fake in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into();
        Url::parse(&base_url).map_err(|e| ClientError::InvalidBaseUrl(base_url.clone(), e))?;
        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_query_id(mut self, query_id: impl Into<String>) -> Self {
        self.query_id = query_id.into();
        self
    }
}
