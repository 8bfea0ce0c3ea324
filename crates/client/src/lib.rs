//! `jobpulse-client`
//!
//! **Responsibility:** the remote metrics boundary.
//!
//! - `SessionContext`: the explicit credential holder (no ambient globals)
//! - `MetricsSource`: the seam the enricher fetches through
//! - `HttpMetricsClient`: the two-call implementation against the metadata service

pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod wire;

pub use client::{HttpMetricsClient, MetricsSource};
pub use config::ClientConfig;
pub use error::{ClientError, FetchError};
pub use session::{SessionContext, SessionToken};
