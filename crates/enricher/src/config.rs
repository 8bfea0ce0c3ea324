//! Enricher configuration.

use std::time::Duration;

use crate::error::ConfigError;

pub const ENV_JITTER_MS: &str = "JOBPULSE_JITTER_MS";
pub const ENV_SWEEP_INTERVAL_MS: &str = "JOBPULSE_SWEEP_INTERVAL_MS";
pub const ENV_SWEEP_LIMIT: &str = "JOBPULSE_SWEEP_LIMIT";
pub const ENV_DEBOUNCE_MS: &str = "JOBPULSE_DEBOUNCE_MS";
pub const ENV_DEBOUNCE_MAX_WAIT_MS: &str = "JOBPULSE_DEBOUNCE_MAX_WAIT_MS";
pub const ENV_RETRY_FAILED: &str = "JOBPULSE_RETRY_FAILED";

/// Timing and retry knobs of the enrichment pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnricherConfig {
    /// Upper bound (exclusive) of the per-fetch random delay.
    pub jitter_max: Duration,
    /// Period of the bounded sweep.
    pub sweep_interval: Duration,
    /// Number of sweep firings before the sweep cancels itself.
    pub sweep_limit: u32,
    /// Quiet period before a change notification triggers a scan.
    /// Zero scans on every notification.
    pub debounce: Duration,
    /// Longest a burst of notifications may hold back its scan, counted from
    /// the first notice of the burst.
    pub debounce_max_wait: Duration,
    /// Let sweep passes clear and re-attempt failed entries.
    pub retry_failed: bool,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            jitter_max: Duration::from_millis(2000),
            sweep_interval: Duration::from_secs(3),
            sweep_limit: 10,
            debounce: Duration::from_millis(150),
            debounce_max_wait: Duration::from_secs(1),
            retry_failed: false,
        }
    }
}

impl EnricherConfig {
    /// Defaults overridden by `JOBPULSE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = parse_env::<u64>(&lookup, ENV_JITTER_MS)? {
            config.jitter_max = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_env::<u64>(&lookup, ENV_SWEEP_INTERVAL_MS)? {
            if ms == 0 {
                return Err(ConfigError::InvalidEnv(ENV_SWEEP_INTERVAL_MS, "must be positive".into()));
            }
            config.sweep_interval = Duration::from_millis(ms);
        }
        if let Some(limit) = parse_env::<u32>(&lookup, ENV_SWEEP_LIMIT)? {
            config.sweep_limit = limit;
        }
        if let Some(ms) = parse_env::<u64>(&lookup, ENV_DEBOUNCE_MS)? {
            config.debounce = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_env::<u64>(&lookup, ENV_DEBOUNCE_MAX_WAIT_MS)? {
            config.debounce_max_wait = Duration::from_millis(ms);
        }
        if let Some(retry) = parse_env::<bool>(&lookup, ENV_RETRY_FAILED)? {
            config.retry_failed = retry;
        }

        Ok(config)
    }

    pub fn with_jitter_max(mut self, jitter_max: Duration) -> Self {
        self.jitter_max = jitter_max;
        self
    }

    /// A zero `interval` disables the sweep.
    pub fn with_sweep(mut self, interval: Duration, limit: u32) -> Self {
        self.sweep_interval = interval;
        self.sweep_limit = limit;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_debounce_max_wait(mut self, max_wait: Duration) -> Self {
        self.debounce_max_wait = max_wait;
        self
    }

    /// Number of sweep firings the watcher will actually run.
    pub fn effective_sweep_limit(&self) -> u32 {
        if self.sweep_interval.is_zero() { 0 } else { self.sweep_limit }
    }

    pub fn with_retry_failed(mut self, retry_failed: bool) -> Self {
        self.retry_failed = retry_failed;
        self
    }
}

fn parse_env<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnv(key, e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_documented_timings() {
        let config = EnricherConfig::default();
        assert_eq!(config.jitter_max, Duration::from_millis(2000));
        assert_eq!(config.sweep_interval, Duration::from_secs(3));
        assert_eq!(config.sweep_limit, 10);
        assert!(!config.retry_failed);
        assert_eq!(config.debounce_max_wait, Duration::from_secs(1));
    }

    #[test]
    fn zero_sweep_interval_disables_the_sweep() {
        let config = EnricherConfig::default().with_sweep(Duration::ZERO, 10);
        assert_eq!(config.effective_sweep_limit(), 0);
        assert_eq!(EnricherConfig::default().effective_sweep_limit(), 10);
    }

    #[test]
    fn env_overrides_apply() {
        let config = EnricherConfig::from_lookup(lookup(&[
            (ENV_JITTER_MS, "0"),
            (ENV_SWEEP_INTERVAL_MS, "500"),
            (ENV_SWEEP_LIMIT, "4"),
            (ENV_DEBOUNCE_MS, "0"),
            (ENV_DEBOUNCE_MAX_WAIT_MS, "400"),
            (ENV_RETRY_FAILED, "true"),
        ]))
        .unwrap();

        assert_eq!(config.jitter_max, Duration::ZERO);
        assert_eq!(config.sweep_interval, Duration::from_millis(500));
        assert_eq!(config.sweep_limit, 4);
        assert_eq!(config.debounce, Duration::ZERO);
        assert_eq!(config.debounce_max_wait, Duration::from_millis(400));
        assert!(config.retry_failed);
    }

    #[test]
    fn invalid_env_values_are_rejected() {
        let err = EnricherConfig::from_lookup(lookup(&[(ENV_SWEEP_LIMIT, "ten")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv(ENV_SWEEP_LIMIT, _)));

        let err = EnricherConfig::from_lookup(lookup(&[(ENV_SWEEP_INTERVAL_MS, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv(ENV_SWEEP_INTERVAL_MS, _)));
    }
}
