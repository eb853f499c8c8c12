//! Calendar domain types shared by the core engine and its adapters.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CalEditError, Result};

/// A remote calendar selected for monitoring.
///
/// Identity is `id`; `display_name` only matters for matching against the
/// configured names and for logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoredCalendar {
    pub id: String,
    pub display_name: String,
}

impl MonitoredCalendar {
    /// Pair a remote calendar id with its display name.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self { id: id.into(), display_name: display_name.into() }
    }
}

/// A single (already expanded) event instance owned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub description: Option<String>,
}

/// Literal text substitution applied to event descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplacementRule {
    pub original_text: String,
    pub replacement_text: String,
}

impl ReplacementRule {
    pub fn new(original_text: impl Into<String>, replacement_text: impl Into<String>) -> Self {
        Self { original_text: original_text.into(), replacement_text: replacement_text.into() }
    }
}

/// Half-open interval `[start, end)` of event start times eligible for a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Build a window, rejecting `end < start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(CalEditError::InvalidInput(format!(
                "time window ends ({end}) before it starts ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    /// The rolling window `[now, now + period)`.
    pub fn starting_at(now: DateTime<Utc>, period: std::time::Duration) -> Result<Self> {
        let span = chrono::Duration::from_std(period).map_err(|e| {
            CalEditError::Config(format!("update period {period:?} out of range: {e}"))
        })?;
        let end = now.checked_add_signed(span).ok_or_else(|| {
            CalEditError::Config(format!("update period {period:?} overflows the calendar"))
        })?;
        Self::new(now, end)
    }

    /// Whether `instant` falls inside `[start, end)`.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// A window with `start == end` admits no event.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// One pending description rewrite within a calendar batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    pub event_id: String,
    pub new_description: String,
}

impl EventUpdate {
    pub fn new(event_id: impl Into<String>, new_description: impl Into<String>) -> Self {
        Self { event_id: event_id.into(), new_description: new_description.into() }
    }
}

/// Why an individual update did not land.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum FailureReason {
    /// The batch (or this item's request) never got an answer from the service.
    Transport(String),
    /// The service answered and refused this item.
    Rejected(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(detail) => write!(f, "transport: {detail}"),
            Self::Rejected(detail) => write!(f, "rejected: {detail}"),
        }
    }
}

/// Per-event result of a pass. Produced and consumed within that pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "camelCase")]
pub enum UpdateOutcome {
    Unchanged,
    Updated,
    Failed(FailureReason),
}

impl UpdateOutcome {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn window_is_half_open() {
        let window = TimeWindow::new(at(8), at(10)).unwrap();
        assert!(window.contains(at(8)));
        assert!(window.contains(at(9)));
        assert!(!window.contains(at(10)));
        assert!(!window.contains(at(7)));
    }

    #[test]
    fn window_rejects_inverted_bounds() {
        let err = TimeWindow::new(at(10), at(8)).unwrap_err();
        assert!(matches!(err, CalEditError::InvalidInput(_)));
    }

    #[test]
    fn rolling_window_spans_the_period() {
        let window = TimeWindow::starting_at(at(0), Duration::from_secs(3 * 24 * 3600)).unwrap();
        assert_eq!(window.end - window.start, chrono::Duration::days(3));
        assert!(!window.is_empty());
    }

    #[test]
    fn zero_period_gives_empty_window() {
        let window = TimeWindow::starting_at(at(0), Duration::ZERO).unwrap();
        assert!(window.is_empty());
        assert!(!window.contains(at(0)));
    }

    #[test]
    fn outcome_serializes_reason() {
        let outcome = UpdateOutcome::Failed(FailureReason::Rejected("gone".into()));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"]["kind"], "rejected");
    }
}
