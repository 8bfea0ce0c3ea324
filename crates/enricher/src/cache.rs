//! Process-lifetime metrics cache with in-flight de-duplication.
//!
//! Every job id owns one slot:
//!
//! - `Pending`: a fetch is outstanding; later lookups join it
//! - `Resolved`: a record is cached and served without remote calls
//! - `Failed`: the last fetch produced nothing; treated as a miss
//!
//! No eviction, no TTL: the population is bounded by the listings of one
//! document session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use jobpulse_core::{JobId, MetricsRecord};

#[derive(Debug, Clone)]
enum Progress {
    Waiting,
    Done(Option<MetricsRecord>),
}

#[derive(Debug)]
enum Slot {
    Pending(watch::Receiver<Progress>),
    Resolved(MetricsRecord),
    Failed,
}

/// Result of [`MetricsCache::lookup_or_claim`].
#[derive(Debug)]
pub enum Lookup {
    /// Cached record; render directly.
    Hit(MetricsRecord),
    /// Another fetch for the same id is outstanding.
    InFlight(InFlight),
    /// Nobody is fetching this id; the caller now owns the fetch.
    Miss(FetchTicket),
}

/// Handle on an outstanding fetch started by someone else.
#[derive(Debug)]
pub struct InFlight {
    rx: watch::Receiver<Progress>,
}

impl InFlight {
    /// Wait for the outstanding fetch. `None` when it failed or was abandoned.
    pub async fn wait(mut self) -> Option<MetricsRecord> {
        loop {
            if let Progress::Done(outcome) = &*self.rx.borrow_and_update() {
                return outcome.clone();
            }
            if self.rx.changed().await.is_err() {
                return match &*self.rx.borrow() {
                    Progress::Done(outcome) => outcome.clone(),
                    Progress::Waiting => None,
                };
            }
        }
    }
}

/// Ownership of the single outstanding fetch for one job id.
///
/// Dropping an uncompleted ticket marks the slot failed so joiners and
/// later scans are not stuck behind an abandoned fetch.
#[derive(Debug)]
pub struct FetchTicket {
    job_id: JobId,
    tx: Option<watch::Sender<Progress>>,
    cache: MetricsCache,
}

impl FetchTicket {
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }
}

impl Drop for FetchTicket {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            self.cache.finish(&self.job_id, &tx, None);
        }
    }
}

/// Shared mapping from job id to metrics slot. Cloning shares the map.
#[derive(Debug, Clone, Default)]
pub struct MetricsCache {
    slots: Arc<Mutex<HashMap<JobId, Slot>>>,
}

impl MetricsCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<JobId, Slot>> {
        match self.slots.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Cached record for `job_id`, if a fetch for it succeeded.
    pub fn get(&self, job_id: &JobId) -> Option<MetricsRecord> {
        match self.lock().get(job_id) {
            Some(Slot::Resolved(record)) => Some(record.clone()),
            _ => None,
        }
    }

    /// Store a record unconditionally; the last write wins.
    pub fn set(&self, job_id: JobId, record: MetricsRecord) {
        self.lock().insert(job_id, Slot::Resolved(record));
    }

    /// Serve from cache, join an outstanding fetch, or claim a new one.
    pub fn lookup_or_claim(&self, job_id: &JobId) -> Lookup {
        let mut slots = self.lock();
        match slots.get(job_id) {
            Some(Slot::Resolved(record)) => return Lookup::Hit(record.clone()),
            Some(Slot::Pending(rx)) => return Lookup::InFlight(InFlight { rx: rx.clone() }),
            Some(Slot::Failed) | None => {}
        }

        let (tx, rx) = watch::channel(Progress::Waiting);
        slots.insert(job_id.clone(), Slot::Pending(rx));
        drop(slots);

        Lookup::Miss(FetchTicket {
            job_id: job_id.clone(),
            tx: Some(tx),
            cache: self.clone(),
        })
    }

    /// Record the outcome of a claimed fetch and wake every joiner.
    ///
    /// A failure is not cache-backed: the slot becomes `Failed` and the next
    /// lookup claims a fresh fetch.
    pub fn complete(&self, mut ticket: FetchTicket, outcome: Option<MetricsRecord>) {
        if let Some(tx) = ticket.tx.take() {
            self.finish(&ticket.job_id, &tx, outcome);
        }
    }

    fn finish(&self, job_id: &JobId, tx: &watch::Sender<Progress>, outcome: Option<MetricsRecord>) {
        let slot = match &outcome {
            Some(record) => Slot::Resolved(record.clone()),
            None => Slot::Failed,
        };
        {
            let mut slots = self.lock();
            // A concurrent `set` may have resolved the slot already; a failure
            // must not clobber it.
            let keep_existing = outcome.is_none() && matches!(slots.get(job_id), Some(Slot::Resolved(_)));
            if !keep_existing {
                slots.insert(job_id.clone(), slot);
            }
        }
        tx.send_replace(Progress::Done(outcome));
    }

    pub fn is_pending(&self, job_id: &JobId) -> bool {
        matches!(self.lock().get(job_id), Some(Slot::Pending(_)))
    }

    /// Number of cached records.
    pub fn resolved_len(&self) -> usize {
        self.lock()
            .values()
            .filter(|slot| matches!(slot, Slot::Resolved(_)))
            .count()
    }
}
