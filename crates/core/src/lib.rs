//! `jobpulse-core`: domain primitives shared by the client and the enricher.
//!
//! This crate contains **pure domain** types (no IO, no async runtime).

pub mod error;
pub mod id;
pub mod metrics;
pub mod threshold;

pub use error::{DomainError, DomainResult};
pub use id::JobId;
pub use metrics::MetricsRecord;
pub use threshold::Threshold;
