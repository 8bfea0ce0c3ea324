//! Remote metrics client.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, warn};

use jobpulse_core::{JobId, MetricsRecord};

use crate::config::{ClientConfig, NORMALIZED_ACCEPT};
use crate::error::{ClientError, FetchError};
use crate::session::{SessionContext, SessionToken};
use crate::wire::{self, DetailsResponse};

/// Header carrying the session credential on both calls.
pub const CSRF_HEADER: &str = "csrf-token";

/// Source of metrics records, one fetch per job id.
///
/// Implementations must not touch shared state beyond producing the value;
/// caching and de-duplication are the caller's job.
#[async_trait]
pub trait MetricsSource: Send + Sync + 'static {
    async fn fetch(&self, job_id: &JobId) -> Result<MetricsRecord, FetchError>;
}

/// Two-call client against the metadata service.
///
/// 1. details call: view count and original listing date
/// 2. applicant-insights call: applicant count
///
/// The insights call only runs after the details body parsed. A transport or
/// parse failure on either call fails the whole fetch.
#[derive(Debug, Clone)]
pub struct HttpMetricsClient {
    http: Client,
    config: ClientConfig,
    session: SessionContext,
}

impl HttpMetricsClient {
    pub fn new(config: ClientConfig, session: SessionContext) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            http,
            config,
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn details_url(&self, job_id: &JobId) -> String {
        format!(
            "{}/voyager/api/jobs/jobPostings/{}",
            self.config.base_url,
            urlencoding::encode(job_id.as_str())
        )
    }

    pub fn insights_url(&self, job_id: &JobId) -> String {
        format!(
            "{}/voyager/api/graphql?variables={}&queryId={}",
            self.config.base_url,
            wire::insights_variables(&job_id.posting_urn()),
            self.config.query_id
        )
    }

    async fn fetch_details(
        &self,
        token: &SessionToken,
        job_id: &JobId,
    ) -> Result<DetailsResponse, FetchError> {
        let resp = self
            .http
            .get(self.details_url(job_id))
            .header(reqwest::header::ACCEPT, NORMALIZED_ACCEPT)
            .header(reqwest::header::ACCEPT_LANGUAGE, &self.config.accept_language)
            .header(CSRF_HEADER, token.expose())
            .header("sec-fetch-dest", "empty")
            .header("sec-fetch-mode", "cors")
            .header("sec-fetch-site", "same-origin")
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Api(status.as_u16(), resp.text().await.unwrap_or_default()));
        }

        let body = read_body(resp).await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Parse(format!("details: {e}")))
    }

    /// `Ok(None)` when the service answered with a non-success status: the
    /// insights data degraded but the fetch as a whole stands.
    async fn fetch_applicant_count(
        &self,
        token: &SessionToken,
        job_id: &JobId,
    ) -> Result<Option<u64>, FetchError> {
        let resp = self
            .http
            .get(self.insights_url(job_id))
            .header(CSRF_HEADER, token.expose())
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(job_id = %job_id, status = status.as_u16(), "applicant insights degraded");
            return Ok(None);
        }

        let body = read_body(resp).await?;
        let value: Value =
            serde_json::from_str(&body).map_err(|e| FetchError::Parse(format!("insights: {e}")))?;
        Ok(Some(wire::applicant_count(&value)))
    }
}

async fn read_body(resp: Response) -> Result<String, FetchError> {
    resp.text().await.map_err(|e| FetchError::Network(e.to_string()))
}

#[async_trait]
impl MetricsSource for HttpMetricsClient {
    async fn fetch(&self, job_id: &JobId) -> Result<MetricsRecord, FetchError> {
        let Some(token) = self.session.current() else {
            debug!(job_id = %job_id, "session token not available; skipping fetch");
            return Err(FetchError::MissingCredential);
        };

        let details = self.fetch_details(&token, job_id).await?;
        let applicant_count = self.fetch_applicant_count(&token, job_id).await?;

        let record = MetricsRecord::new(
            applicant_count,
            details.views(),
            details.original_listed_at(),
        );
        debug!(job_id = %job_id, ?record, "fetched metrics");
        Ok(record)
    }
}
