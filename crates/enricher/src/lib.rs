//! `jobpulse-enricher`
//!
//! **Responsibility:** keep a host document's job listings annotated with
//! applicant, view and age indicators.
//!
//! Data flow:
//!
//! ```text
//! initial load / ChangeWatcher ─▶ Enricher::scan ─▶ JobId::from_href
//!                                        │
//!                     MetricsCache hit ──┼──▶ render ─▶ DocumentHost
//!                                        │
//!             miss ─▶ FetchScheduler ─▶ MetricsSource ─▶ MetricsCache ─▶ render
//! ```
//!
//! The host document and the configuration store are injected capabilities
//! (`DocumentHost`, `ConfigStore`); in-memory implementations are provided for
//! tests and the CLI.

pub mod cache;
pub mod config;
pub mod control;
pub mod document;
pub mod enricher;
pub mod error;
pub mod handler;
pub mod memory;
pub mod render;
pub mod scheduler;
pub mod store;
pub mod style;
pub mod watcher;

pub use cache::{InFlight, Lookup, MetricsCache};
pub use config::EnricherConfig;
pub use control::{ControlMessage, ControlReply};
pub use document::{DocumentChange, DocumentHost, EntryId, IndicatorId, IndicatorMark, IndicatorRef};
pub use enricher::{Enricher, ScanId, ScanPass, ScanReport, ScanTrigger};
pub use error::ConfigError;
pub use handler::{ConfigUpdateHandler, LimitUpdate};
pub use memory::InMemoryDocument;
pub use render::{Badge, BadgeRole, IndicatorView, Tone};
pub use style::{StyledBadge, StyledIndicator};
pub use scheduler::FetchScheduler;
pub use store::{ConfigStore, InMemoryConfigStore, LIMIT_KEY, SESSION_TOKEN_KEY};
pub use watcher::{ChangeWatcher, WatcherHandle, WatcherStats};
