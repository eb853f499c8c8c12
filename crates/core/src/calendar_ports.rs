//! Calendar service port interfaces
//!
//! The core never talks to a concrete calendar backend; it is handed an
//! implementation of [`CalendarService`] (Google Calendar in production, an
//! in-memory fake in tests).

use std::collections::HashMap;

use async_trait::async_trait;
use caledit_domain::{CalendarEvent, EventUpdate, MonitoredCalendar, Result, TimeWindow};

/// Per-item result of a batched update, keyed by event id.
///
/// An `Err` entry means the service answered for that item and refused it (or
/// failed it individually); sibling entries are unaffected.
pub type BatchResponse = HashMap<String, Result<()>>;

/// Trait for remote calendar operations
///
/// Every method may fail with a transport or authorization error. Callers
/// treat those failures as recoverable.
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// List every calendar visible to the authenticated account.
    async fn list_calendars(&self) -> Result<Vec<MonitoredCalendar>>;

    /// List single (expanded) event instances of one calendar within a window,
    /// ordered by start time.
    async fn list_events(&self, calendar_id: &str, window: &TimeWindow)
        -> Result<Vec<CalendarEvent>>;

    /// Rewrite descriptions of several events of the same calendar in one
    /// batched request.
    ///
    /// Returns `Err` only when the batch as a whole failed; individual item
    /// failures are reported inside the [`BatchResponse`].
    async fn batch_update_descriptions(
        &self,
        calendar_id: &str,
        updates: &[EventUpdate],
    ) -> Result<BatchResponse>;
}
