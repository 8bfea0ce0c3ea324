//! Client error model.

/// Failure of a single metrics fetch.
///
/// Callers map every variant to the "unavailable" result; the variants exist
/// so logs can tell a missing credential from a broken remote.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("session token is not available")]
    MissingCredential,
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl FetchError {
    /// A missing credential is an expected state, not a remote failure.
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, FetchError::MissingCredential)
    }
}

/// Failure to construct a client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid base url {0:?}: {1}")]
    InvalidBaseUrl(String, url::ParseError),
    #[error("invalid environment value {0}: {1}")]
    InvalidEnv(&'static str, String),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
