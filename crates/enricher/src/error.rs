//! Enricher error model.
//!
//! Fetch failures never surface here: they resolve to the "unavailable"
//! indicator at the point of fetch.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configuration store could not be read.
    #[error("config store unavailable: {0}")]
    Unavailable(String),

    /// An environment override could not be parsed.
    #[error("invalid environment value {0}: {1}")]
    InvalidEnv(&'static str, String),
}
