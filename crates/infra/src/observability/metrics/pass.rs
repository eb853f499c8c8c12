//! Sync pass metrics
//!
//! ## Design
//! - **No locking needed** - simple atomic counters
//! - **Relaxed ordering** - counters are independent; readers tolerate a
//!   snapshot that straddles a pass boundary
//! - **Microsecond storage** - durations stored in µs, reported in ms

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

use caledit_core::PassSummary;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Counters accumulated over every pass since startup
#[derive(Debug, Default)]
pub struct PassMetrics {
    passes: AtomicU64,
    aborted_passes: AtomicU64,
    events_updated: AtomicU64,
    events_unchanged: AtomicU64,
    events_failed: AtomicU64,
    calendar_failures: AtomicU64,
    last_pass_duration_micros: AtomicU64,
    /// Unix millis of the last completed pass, 0 when none ran yet.
    last_completed_at_millis: AtomicI64,
}

impl PassMetrics {
    /// Counters starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one finished pass into the counters.
    pub fn record_pass(&self, summary: &PassSummary, elapsed: Duration, completed_at: DateTime<Utc>) {
        self.passes.fetch_add(1, Ordering::Relaxed);
        if summary.error.is_some() {
            self.aborted_passes.fetch_add(1, Ordering::Relaxed);
        }
        self.events_updated.fetch_add(summary.updated() as u64, Ordering::Relaxed);
        self.events_unchanged.fetch_add(summary.unchanged() as u64, Ordering::Relaxed);
        self.events_failed.fetch_add(summary.failed_items() as u64, Ordering::Relaxed);
        self.calendar_failures.fetch_add(summary.failed_calendars() as u64, Ordering::Relaxed);

        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.last_pass_duration_micros.store(micros, Ordering::Relaxed);
        self.last_completed_at_millis.store(completed_at.timestamp_millis(), Ordering::Relaxed);
    }

    /// Passes recorded so far, aborted ones included.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes.load(Ordering::Relaxed)
    }

    /// Point-in-time copy for reporting.
    pub fn snapshot(&self) -> PassMetricsSnapshot {
        let completed = self.last_completed_at_millis.load(Ordering::Relaxed);
        PassMetricsSnapshot {
            passes: self.passes(),
            aborted_passes: self.aborted_passes.load(Ordering::Relaxed),
            events_updated: self.events_updated.load(Ordering::Relaxed),
            events_unchanged: self.events_unchanged.load(Ordering::Relaxed),
            events_failed: self.events_failed.load(Ordering::Relaxed),
            calendar_failures: self.calendar_failures.load(Ordering::Relaxed),
            last_pass_duration_ms: self.last_pass_duration_micros.load(Ordering::Relaxed) / 1_000,
            last_completed_at: (completed != 0)
                .then(|| DateTime::from_timestamp_millis(completed))
                .flatten(),
        }
    }
}

/// Serializable view of [`PassMetrics`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassMetricsSnapshot {
    pub passes: u64,
    pub aborted_passes: u64,
    pub events_updated: u64,
    pub events_unchanged: u64,
    pub events_failed: u64,
    pub calendar_failures: u64,
    pub last_pass_duration_ms: u64,
    pub last_completed_at: Option<DateTime<Utc>>,
}
