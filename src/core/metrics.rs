//! Logger metrics for observability
//!
//! Counters describing how entries fared across channels: how many were
//! dispatched, written, gated out, deferred, or lost to a channel failure.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use rust_channel_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_entry();
/// metrics.record_written();
/// metrics.record_failure();
///
/// assert_eq!(metrics.entries_logged(), 1);
/// assert_eq!(metrics.writes_completed(), 1);
/// assert_eq!(metrics.channel_failures(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Entries built by `log` calls
    entries_logged: AtomicU64,

    /// Channel writes that finished successfully, immediate or deferred
    writes_completed: AtomicU64,

    /// Channel writes rejected by gating
    writes_skipped: AtomicU64,

    /// Deferred writes started
    deferred_started: AtomicU64,

    /// Failed or panicked channel writes
    channel_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            entries_logged: AtomicU64::new(0),
            writes_completed: AtomicU64::new(0),
            writes_skipped: AtomicU64::new(0),
            deferred_started: AtomicU64::new(0),
            channel_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn entries_logged(&self) -> u64 {
        self.entries_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn writes_completed(&self) -> u64 {
        self.writes_completed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn writes_skipped(&self) -> u64 {
        self.writes_skipped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn deferred_started(&self) -> u64 {
        self.deferred_started.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn channel_failures(&self) -> u64 {
        self.channel_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_entry(&self) -> u64 {
        self.entries_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.writes_completed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_skipped(&self) -> u64 {
        self.writes_skipped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_deferred(&self) -> u64 {
        self.deferred_started.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failure(&self) -> u64 {
        self.channel_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Failed writes as a percentage of attempted (non-skipped) writes
    ///
    /// Returns 0.0 if nothing has been attempted yet.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.channel_failures() as f64;
        let total = self.writes_completed() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.entries_logged.store(0, Ordering::Relaxed);
        self.writes_completed.store(0, Ordering::Relaxed);
        self.writes_skipped.store(0, Ordering::Relaxed);
        self.deferred_started.store(0, Ordering::Relaxed);
        self.channel_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            entries_logged: AtomicU64::new(self.entries_logged()),
            writes_completed: AtomicU64::new(self.writes_completed()),
            writes_skipped: AtomicU64::new(self.writes_skipped()),
            deferred_started: AtomicU64::new(self.deferred_started()),
            channel_failures: AtomicU64::new(self.channel_failures()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.entries_logged(), 0);
        assert_eq!(metrics.writes_completed(), 0);
        assert_eq!(metrics.writes_skipped(), 0);
        assert_eq!(metrics.deferred_started(), 0);
        assert_eq!(metrics.channel_failures(), 0);
    }

    #[test]
    fn test_metrics_record_returns_previous() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_failure(), 0);
        assert_eq!(metrics.channel_failures(), 1);
        metrics.record_failure();
        assert_eq!(metrics.channel_failures(), 2);
    }

    #[test]
    fn test_metrics_failure_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.failure_rate(), 0.0);

        for _ in 0..90 {
            metrics.record_written();
        }
        for _ in 0..10 {
            metrics.record_failure();
        }

        let rate = metrics.failure_rate();
        assert!((9.9..=10.1).contains(&rate), "Failure rate was {}", rate);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_entry();
        metrics.record_skipped();
        metrics.record_deferred();

        metrics.reset();

        assert_eq!(metrics.entries_logged(), 0);
        assert_eq!(metrics.writes_skipped(), 0);
        assert_eq!(metrics.deferred_started(), 0);
    }

    #[test]
    fn test_metrics_clone_is_snapshot() {
        let metrics = LoggerMetrics::new();
        metrics.record_entry();

        let snapshot = metrics.clone();
        metrics.record_entry();

        assert_eq!(metrics.entries_logged(), 2);
        assert_eq!(snapshot.entries_logged(), 1);
    }
}
