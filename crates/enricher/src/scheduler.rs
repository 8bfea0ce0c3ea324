//! Jittered fetch scheduling.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;
use tracing::debug;

use jobpulse_core::JobId;

/// Defers each fetch by a delay drawn uniformly from `[0, max_jitter)`.
///
/// Delays are independent per job id. There is no concurrency cap: every
/// scheduled fetch runs as its own task.
#[derive(Debug, Clone)]
pub struct FetchScheduler {
    max_jitter: Duration,
}

impl FetchScheduler {
    pub fn new(max_jitter: Duration) -> Self {
        Self { max_jitter }
    }

    /// Scheduler that starts every fetch immediately.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn max_jitter(&self) -> Duration {
        self.max_jitter
    }

    /// Draw one delay.
    pub fn jitter(&self) -> Duration {
        let max_ms = self.max_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..max_ms))
    }

    /// Spawn `task` after a fresh jitter delay.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, job_id: &JobId, task: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.jitter();
        debug!(job_id = %job_id, delay_ms = delay.as_millis() as u64, "fetch scheduled");

        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            task.await;
        })
    }
}

impl Default for FetchScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn jitter_stays_in_range() {
        let scheduler = FetchScheduler::default();
        for _ in 0..1000 {
            assert!(scheduler.jitter() < Duration::from_millis(2000));
        }
    }

    #[test]
    fn zero_jitter_is_immediate() {
        assert_eq!(FetchScheduler::immediate().jitter(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn task_runs_after_its_delay() {
        let scheduler = FetchScheduler::new(Duration::from_millis(2000));
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();

        let id: JobId = "1".parse().unwrap();
        let handle = scheduler.schedule(&id, async move {
            flag.store(true, Ordering::SeqCst);
        });

        tokio::time::advance(Duration::from_millis(2000)).await;
        handle.await.unwrap();
        assert!(ran.load(Ordering::SeqCst));
    }
}
