//! Per-calendar and per-pass results

use std::collections::BTreeMap;

use caledit_domain::{MonitoredCalendar, TimeWindow, UpdateOutcome};
use chrono::{DateTime, Utc};

use super::error::SyncError;

/// What happened to one monitored calendar during a pass
#[derive(Debug, Clone)]
pub struct CalendarReport {
    pub calendar: MonitoredCalendar,
    /// Outcome per event id, for every event found in the window.
    pub outcomes: BTreeMap<String, UpdateOutcome>,
    /// Set when the calendar could not be processed at all.
    pub error: Option<SyncError>,
}

impl CalendarReport {
    /// Calendar processed to the end, with one outcome per event found.
    pub fn completed(calendar: MonitoredCalendar, outcomes: BTreeMap<String, UpdateOutcome>) -> Self {
        Self { calendar, outcomes, error: None }
    }

    /// Calendar skipped for this pass because of `error`.
    pub fn failed(calendar: MonitoredCalendar, error: SyncError) -> Self {
        Self { calendar, outcomes: BTreeMap::new(), error: Some(error) }
    }

    /// Events whose new description was accepted.
    #[must_use]
    pub fn updated(&self) -> usize {
        self.count(|outcome| matches!(outcome, UpdateOutcome::Updated))
    }

    /// Events left alone.
    #[must_use]
    pub fn unchanged(&self) -> usize {
        self.count(|outcome| matches!(outcome, UpdateOutcome::Unchanged))
    }

    /// Events whose update did not land.
    #[must_use]
    pub fn failed_items(&self) -> usize {
        self.count(UpdateOutcome::is_failed)
    }

    /// Outcome recorded for `event_id`, if the event was in the window.
    pub fn outcome(&self, event_id: &str) -> Option<&UpdateOutcome> {
        self.outcomes.get(event_id)
    }

    fn count(&self, predicate: impl Fn(&UpdateOutcome) -> bool) -> usize {
        self.outcomes.values().filter(|outcome| predicate(*outcome)).count()
    }
}

/// Result of one sync pass across all monitored calendars
#[derive(Debug, Clone)]
pub struct PassSummary {
    pub started_at: DateTime<Utc>,
    /// `None` when the pass was aborted before a window could be computed.
    pub window: Option<TimeWindow>,
    pub calendars: Vec<CalendarReport>,
    /// Pass-level failure; calendar and item failures live in the reports.
    pub error: Option<SyncError>,
}

impl PassSummary {
    /// Pass that stopped before touching any calendar.
    pub fn aborted(started_at: DateTime<Utc>, error: SyncError) -> Self {
        Self { started_at, window: None, calendars: Vec::new(), error: Some(error) }
    }

    pub fn report(&self, calendar_id: &str) -> Option<&CalendarReport> {
        self.calendars.iter().find(|report| report.calendar.id == calendar_id)
    }

    pub fn outcome(&self, calendar_id: &str, event_id: &str) -> Option<&UpdateOutcome> {
        self.report(calendar_id).and_then(|report| report.outcome(event_id))
    }

    #[must_use]
    pub fn updated(&self) -> usize {
        self.calendars.iter().map(CalendarReport::updated).sum()
    }

    #[must_use]
    pub fn unchanged(&self) -> usize {
        self.calendars.iter().map(CalendarReport::unchanged).sum()
    }

    #[must_use]
    pub fn failed_items(&self) -> usize {
        self.calendars.iter().map(CalendarReport::failed_items).sum()
    }

    /// Calendars skipped because their listing failed.
    #[must_use]
    pub fn failed_calendars(&self) -> usize {
        self.calendars.iter().filter(|report| report.error.is_some()).count()
    }
}
