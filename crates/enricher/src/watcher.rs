//! Change watcher: re-scans on document mutations and on a bounded sweep.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Notify;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use jobpulse_client::MetricsSource;
use jobpulse_core::Threshold;

use crate::document::{DocumentChange, DocumentHost};
use crate::enricher::{Enricher, ScanPass, ScanTrigger};

/// Watcher runtime statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WatcherStats {
    /// Scans triggered by change notifications (after debouncing).
    pub change_scans: u64,
    /// Sweep firings so far; stops growing at the configured limit.
    pub sweeps_fired: u32,
    /// Whether the host closed its change feed.
    pub feed_closed: bool,
}

/// Handle to control a running watcher.
#[derive(Debug)]
pub struct WatcherHandle {
    shutdown: Arc<Notify>,
    join: Option<JoinHandle<()>>,
    stats: Arc<Mutex<WatcherStats>>,
}

impl WatcherHandle {
    /// Current watcher statistics.
    pub fn stats(&self) -> WatcherStats {
        match self.stats.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.as_ref().is_none_or(|j| j.is_finished())
    }

    /// Request shutdown and wait for the watcher task to stop.
    ///
    /// Fetches already scheduled keep running to completion.
    pub async fn shutdown(mut self) {
        self.shutdown.notify_one();
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }
}

/// Keeps the document enriched while it changes.
///
/// Two independent triggers re-run the scanner with the threshold captured at
/// start:
///
/// - change notifications, coalesced by a trailing-edge debounce that never
///   holds a burst back longer than `debounce_max_wait`
/// - a fixed-interval sweep that cancels itself after `sweep_limit` firings
///
/// The change subscription lives until shutdown or until the host closes it.
#[derive(Debug)]
pub struct ChangeWatcher;

impl ChangeWatcher {
    /// Spawn the watcher. Must be called from within a Tokio runtime.
    pub fn spawn<D, S>(enricher: Enricher<D, S>, threshold: Threshold) -> WatcherHandle
    where
        D: DocumentHost,
        S: MetricsSource,
    {
        let shutdown = Arc::new(Notify::new());
        let stats = Arc::new(Mutex::new(WatcherStats::default()));
        // Subscribe before spawning so no notice between now and the first
        // poll is lost.
        let changes = enricher.document().subscribe();

        let join = tokio::spawn(watch_loop(
            enricher,
            threshold,
            changes,
            shutdown.clone(),
            stats.clone(),
        ));

        WatcherHandle {
            shutdown,
            join: Some(join),
            stats,
        }
    }
}

impl<D, S> Enricher<D, S>
where
    D: DocumentHost,
    S: MetricsSource,
{
    /// Initial scan, then attach the watcher.
    pub fn start(&self, threshold: Threshold) -> (ScanPass, WatcherHandle) {
        let pass = self.scan_with(threshold, ScanTrigger::Initial);
        let watcher = ChangeWatcher::spawn(self.clone(), threshold);
        (pass, watcher)
    }
}

fn update_stats(stats: &Mutex<WatcherStats>, f: impl FnOnce(&mut WatcherStats)) {
    match stats.lock() {
        Ok(mut guard) => f(&mut guard),
        Err(poisoned) => f(&mut poisoned.into_inner()),
    }
}

async fn watch_loop<D, S>(
    enricher: Enricher<D, S>,
    threshold: Threshold,
    mut changes: tokio::sync::broadcast::Receiver<DocumentChange>,
    shutdown: Arc<Notify>,
    stats: Arc<Mutex<WatcherStats>>,
) where
    D: DocumentHost,
    S: MetricsSource,
{
    let config = enricher.config().clone();
    info!(
        %threshold,
        sweep_interval_ms = config.sweep_interval.as_millis() as u64,
        sweep_limit = config.sweep_limit,
        debounce_ms = config.debounce.as_millis() as u64,
        "change watcher started"
    );

    let mut sweeps_left = config.effective_sweep_limit();
    if sweeps_left == 0 && config.sweep_limit > 0 {
        warn!("sweep interval is zero; periodic sweep disabled");
    }
    // `interval_at` rejects a zero period; the timer is never polled then.
    let period = if config.sweep_interval.is_zero() {
        Duration::from_secs(1)
    } else {
        config.sweep_interval
    };
    let mut sweep = tokio::time::interval_at(Instant::now() + period, period);
    sweep.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut subscribed = true;
    let mut deadline: Option<Instant> = None;
    let mut burst_started: Option<Instant> = None;

    loop {
        if !subscribed && sweeps_left == 0 && deadline.is_none() {
            break;
        }

        tokio::select! {
            _ = shutdown.notified() => {
                info!("change watcher received shutdown signal");
                break;
            }
            change = changes.recv(), if subscribed => match change {
                Ok(_) | Err(RecvError::Lagged(_)) => {
                    if config.debounce.is_zero() {
                        enricher.scan_with(threshold, ScanTrigger::Change);
                        update_stats(&stats, |s| s.change_scans += 1);
                    } else {
                        let now = Instant::now();
                        let first = *burst_started.get_or_insert(now);
                        deadline = Some((now + config.debounce).min(first + config.debounce_max_wait));
                    }
                }
                Err(RecvError::Closed) => {
                    info!("document closed its change feed");
                    subscribed = false;
                    update_stats(&stats, |s| s.feed_closed = true);
                }
            },
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                deadline = None;
                burst_started = None;
                enricher.scan_with(threshold, ScanTrigger::Change);
                update_stats(&stats, |s| s.change_scans += 1);
            }
            _ = sweep.tick(), if sweeps_left > 0 => {
                sweeps_left -= 1;
                enricher.scan_with(threshold, ScanTrigger::Sweep);
                update_stats(&stats, |s| s.sweeps_fired += 1);
                if sweeps_left == 0 {
                    debug!("periodic sweep finished");
                }
            }
        }
    }

    info!("change watcher stopped");
}
