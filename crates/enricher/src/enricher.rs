//! Document scanning and the per-entry enrichment flow.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use jobpulse_client::MetricsSource;
use jobpulse_core::{JobId, MetricsRecord, Threshold};

use crate::cache::{Lookup, MetricsCache};
use crate::config::EnricherConfig;
use crate::document::{DocumentHost, IndicatorId, IndicatorMark};
use crate::render::{IndicatorView, render_outcome};
use crate::scheduler::FetchScheduler;

/// Correlation id of one scan pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ScanId(Uuid);

impl ScanId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ScanId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ScanId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// What caused a scan.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanTrigger {
    Initial,
    Change,
    Sweep,
    LimitUpdate,
}

/// Counters of one scan pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Listing entries visited.
    pub seen: usize,
    /// Entries skipped because they already carry an indicator.
    pub skipped: usize,
    /// Failed indicators cleared for another attempt.
    pub retried: usize,
    /// Entries without a usable job id.
    pub unenrichable: usize,
    /// Rendered straight from the cache.
    pub cache_hits: usize,
    /// Joined a fetch already in flight for the same job id.
    pub joined: usize,
    /// New fetches handed to the scheduler.
    pub scheduled: usize,
}

/// Result of [`Enricher::scan`]: counters plus the pass's background tasks.
#[derive(Debug)]
pub struct ScanPass {
    pub id: ScanId,
    pub report: ScanReport,
    tasks: Vec<JoinHandle<()>>,
}

impl ScanPass {
    pub fn outstanding(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    /// Wait until every fetch started or joined by this pass has rendered.
    pub async fn settle(self) -> ScanReport {
        for task in self.tasks {
            if let Err(err) = task.await {
                warn!(scan_id = %self.id, error = %err, "enrichment task ended abnormally");
            }
        }
        self.report
    }
}

/// Scans a host document and keeps its listing entries enriched.
///
/// Cheap to clone; clones share the document, source and cache.
pub struct Enricher<D, S> {
    document: Arc<D>,
    source: Arc<S>,
    cache: MetricsCache,
    scheduler: FetchScheduler,
    config: EnricherConfig,
}

impl<D, S> Clone for Enricher<D, S> {
    fn clone(&self) -> Self {
        Self {
            document: self.document.clone(),
            source: self.source.clone(),
            cache: self.cache.clone(),
            scheduler: self.scheduler.clone(),
            config: self.config.clone(),
        }
    }
}

impl<D, S> Enricher<D, S>
where
    D: DocumentHost,
    S: MetricsSource,
{
    pub fn new(document: Arc<D>, source: Arc<S>, config: EnricherConfig) -> Self {
        Self {
            document,
            source,
            cache: MetricsCache::new(),
            scheduler: FetchScheduler::new(config.jitter_max),
            config,
        }
    }

    pub fn document(&self) -> &Arc<D> {
        &self.document
    }

    pub fn cache(&self) -> &MetricsCache {
        &self.cache
    }

    pub fn config(&self) -> &EnricherConfig {
        &self.config
    }

    /// One discovery pass over the document.
    pub fn scan(&self, threshold: Threshold) -> ScanPass {
        self.scan_with(threshold, ScanTrigger::Initial)
    }

    /// One discovery pass, attributed to `trigger`.
    ///
    /// Entries that already carry an indicator are skipped. With
    /// `retry_failed`, sweep passes first clear `Failed` indicators so the
    /// entry gets exactly one more attempt per sweep. Must run inside a
    /// Tokio runtime: fetches and joins are spawned as tasks.
    pub fn scan_with(&self, threshold: Threshold, trigger: ScanTrigger) -> ScanPass {
        let id = ScanId::new();
        let span = info_span!("scan", scan_id = %id, ?trigger, %threshold);
        let _guard = span.enter();

        let retry_failed = self.config.retry_failed && trigger == ScanTrigger::Sweep;
        let mut report = ScanReport::default();
        let mut tasks = Vec::new();

        for entry in self.document.listing_entries() {
            report.seen += 1;

            if let Some(existing) = self.document.indicator(entry) {
                if !(retry_failed && existing.mark == IndicatorMark::Failed) {
                    report.skipped += 1;
                    continue;
                }
                self.document.remove_indicator(existing.id);
                report.retried += 1;
            }

            let Some(job_id) = self
                .document
                .entry_link(entry)
                .as_deref()
                .and_then(JobId::from_href)
            else {
                report.unenrichable += 1;
                continue;
            };

            let Some(indicator) = self.document.attach_indicator(entry, &IndicatorView::pending())
            else {
                debug!(job_id = %job_id, "entry left the document during scan");
                continue;
            };

            match self.cache.lookup_or_claim(&job_id) {
                Lookup::Hit(record) => {
                    report.cache_hits += 1;
                    show(&*self.document, indicator, Some(&record), threshold);
                }
                Lookup::InFlight(pending) => {
                    report.joined += 1;
                    let document = self.document.clone();
                    let task = async move {
                        let outcome = pending.wait().await;
                        show(&*document, indicator, outcome.as_ref(), threshold);
                    };
                    tasks.push(tokio::spawn(task.instrument(span.clone())));
                }
                Lookup::Miss(ticket) => {
                    report.scheduled += 1;
                    let document = self.document.clone();
                    let source = self.source.clone();
                    let cache = self.cache.clone();
                    let fetch_id = job_id.clone();
                    let task = async move {
                        let outcome = fetch_metrics(&*source, &fetch_id).await;
                        cache.complete(ticket, outcome.clone());
                        show(&*document, indicator, outcome.as_ref(), threshold);
                    };
                    tasks.push(self.scheduler.schedule(&job_id, task.instrument(span.clone())));
                }
            }
        }

        info!(
            seen = report.seen,
            skipped = report.skipped,
            retried = report.retried,
            unenrichable = report.unenrichable,
            cache_hits = report.cache_hits,
            joined = report.joined,
            scheduled = report.scheduled,
            "scan complete"
        );

        ScanPass { id, report, tasks }
    }
}

/// Fetch one record; every failure resolves to `None` here.
async fn fetch_metrics<S>(source: &S, job_id: &JobId) -> Option<MetricsRecord>
where
    S: MetricsSource + ?Sized,
{
    match source.fetch(job_id).await {
        Ok(record) => Some(record),
        Err(err) if err.is_missing_credential() => {
            debug!(job_id = %job_id, "no session token; metrics unavailable");
            None
        }
        Err(err) => {
            warn!(job_id = %job_id, error = %err, "metrics fetch failed");
            None
        }
    }
}

fn show<D>(document: &D, indicator: IndicatorId, outcome: Option<&MetricsRecord>, threshold: Threshold)
where
    D: DocumentHost + ?Sized,
{
    let view = render_outcome(outcome, threshold, Utc::now());
    if !document.update_indicator(indicator, &view) {
        debug!(?indicator, "indicator removed before its metrics arrived");
    }
}
