use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use caledit_core::{BatchResponse, CalendarService};
use caledit_domain::{
    CalEditError, CalendarEvent, EventUpdate, MonitoredCalendar, Result as DomainResult,
    TimeWindow,
};
use chrono::{DateTime, Utc};

/// Build an event with the given description.
pub fn event(id: &str, start_time: DateTime<Utc>, description: Option<&str>) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        title: format!("Class {id}"),
        start_time,
        description: description.map(str::to_string),
    }
}

/// In-memory calendar service.
///
/// Applies successful updates to its stored events so consecutive passes see
/// the rewritten descriptions. Like the real service it does not filter by
/// start time; every stored event of the calendar is returned.
#[derive(Default)]
pub struct FakeCalendarService {
    calendars: Mutex<Vec<MonitoredCalendar>>,
    events: Mutex<HashMap<String, Vec<CalendarEvent>>>,
    fail_listing: AtomicBool,
    hang_listing: AtomicBool,
    failing_calendars: Mutex<HashSet<String>>,
    failing_batches: Mutex<HashSet<String>>,
    hanging_calendars: Mutex<HashSet<String>>,
    hanging_batches: Mutex<HashSet<String>>,
    rejected_events: Mutex<HashSet<String>>,
    dropped_events: Mutex<HashSet<String>>,
    list_calendars_calls: AtomicUsize,
    listed_calendars: Mutex<Vec<String>>,
    batches: Mutex<Vec<(String, Vec<EventUpdate>)>>,
}

impl FakeCalendarService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calendar(self, id: &str, display_name: &str) -> Self {
        self.calendars.lock().unwrap().push(MonitoredCalendar::new(id, display_name));
        self
    }

    pub fn with_event(self, calendar_id: &str, event: CalendarEvent) -> Self {
        self.events.lock().unwrap().entry(calendar_id.to_string()).or_default().push(event);
        self
    }

    pub fn add_calendar(&self, id: &str, display_name: &str) {
        self.calendars.lock().unwrap().push(MonitoredCalendar::new(id, display_name));
    }

    pub fn set_listing_fails(&self, fails: bool) {
        self.fail_listing.store(fails, Ordering::SeqCst);
    }

    /// Calendar listing never answers.
    pub fn set_listing_hangs(&self, hangs: bool) {
        self.hang_listing.store(hangs, Ordering::SeqCst);
    }

    /// Event listing of `calendar_id` never answers.
    pub fn hang_events_for(&self, calendar_id: &str) {
        self.hanging_calendars.lock().unwrap().insert(calendar_id.to_string());
    }

    /// Batch updates on `calendar_id` never answer.
    pub fn hang_batches_for(&self, calendar_id: &str) {
        self.hanging_batches.lock().unwrap().insert(calendar_id.to_string());
    }

    pub fn fail_events_for(&self, calendar_id: &str) {
        self.failing_calendars.lock().unwrap().insert(calendar_id.to_string());
    }

    pub fn fail_batches_for(&self, calendar_id: &str) {
        self.failing_batches.lock().unwrap().insert(calendar_id.to_string());
    }

    pub fn reject_event(&self, event_id: &str) {
        self.rejected_events.lock().unwrap().insert(event_id.to_string());
    }

    /// Leave `event_id` out of batch responses entirely.
    pub fn drop_event_from_response(&self, event_id: &str) {
        self.dropped_events.lock().unwrap().insert(event_id.to_string());
    }

    pub fn list_calendars_calls(&self) -> usize {
        self.list_calendars_calls.load(Ordering::SeqCst)
    }

    pub fn listed_calendars(&self) -> Vec<String> {
        self.listed_calendars.lock().unwrap().clone()
    }

    pub fn batches(&self) -> Vec<(String, Vec<EventUpdate>)> {
        self.batches.lock().unwrap().clone()
    }

    pub fn description(&self, calendar_id: &str, event_id: &str) -> Option<String> {
        self.events
            .lock()
            .unwrap()
            .get(calendar_id)
            .and_then(|events| events.iter().find(|event| event.id == event_id))
            .and_then(|event| event.description.clone())
    }
}

#[async_trait]
impl CalendarService for FakeCalendarService {
    async fn list_calendars(&self) -> DomainResult<Vec<MonitoredCalendar>> {
        self.list_calendars_calls.fetch_add(1, Ordering::SeqCst);
        if self.hang_listing.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(CalEditError::Network("calendar list unavailable".into()));
        }
        Ok(self.calendars.lock().unwrap().clone())
    }

    async fn list_events(
        &self,
        calendar_id: &str,
        _window: &TimeWindow,
    ) -> DomainResult<Vec<CalendarEvent>> {
        self.listed_calendars.lock().unwrap().push(calendar_id.to_string());
        let hangs = self.hanging_calendars.lock().unwrap().contains(calendar_id);
        if hangs {
            std::future::pending::<()>().await;
        }
        if self.failing_calendars.lock().unwrap().contains(calendar_id) {
            return Err(CalEditError::Network(format!("events of {calendar_id} unavailable")));
        }
        Ok(self.events.lock().unwrap().get(calendar_id).cloned().unwrap_or_default())
    }

    async fn batch_update_descriptions(
        &self,
        calendar_id: &str,
        updates: &[EventUpdate],
    ) -> DomainResult<BatchResponse> {
        self.batches.lock().unwrap().push((calendar_id.to_string(), updates.to_vec()));
        let hangs = self.hanging_batches.lock().unwrap().contains(calendar_id);
        if hangs {
            std::future::pending::<()>().await;
        }
        if self.failing_batches.lock().unwrap().contains(calendar_id) {
            return Err(CalEditError::Network("connection reset".into()));
        }

        let rejected = self.rejected_events.lock().unwrap().clone();
        let dropped = self.dropped_events.lock().unwrap().clone();
        let mut events = self.events.lock().unwrap();
        let stored = events.entry(calendar_id.to_string()).or_default();

        let mut response = BatchResponse::new();
        for update in updates {
            if dropped.contains(&update.event_id) {
                continue;
            }
            if rejected.contains(&update.event_id) {
                response.insert(
                    update.event_id.clone(),
                    Err(CalEditError::Rejected("event is read-only".into())),
                );
                continue;
            }
            if let Some(event) = stored.iter_mut().find(|event| event.id == update.event_id) {
                event.description = Some(update.new_description.clone());
            }
            response.insert(update.event_id.clone(), Ok(()));
        }
        Ok(response)
    }
}
