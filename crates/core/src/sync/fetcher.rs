//! Event window fetcher

use std::sync::Arc;
use std::time::Duration;

use caledit_domain::{CalEditError, CalendarEvent, TimeWindow};
use tracing::{debug, instrument};

use super::error::{SyncError, SyncResult};
use crate::calendar_ports::CalendarService;

/// Lists the events of one calendar whose start falls inside a window
pub struct EventWindowFetcher {
    service: Arc<dyn CalendarService>,
    timeout: Duration,
}

impl EventWindowFetcher {
    pub fn new(service: Arc<dyn CalendarService>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    /// Fetch events with `window.start <= start < window.end`, ordered by
    /// start time.
    ///
    /// An empty window returns no events without calling the service. Events
    /// the service returns outside the window (it filters on end time) are
    /// dropped here.
    #[instrument(skip(self), fields(window = %window))]
    pub async fn fetch(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
    ) -> SyncResult<Vec<CalendarEvent>> {
        if window.end < window.start {
            return Err(SyncError::Fetch {
                calendar_id: calendar_id.to_string(),
                source: CalEditError::InvalidInput(format!("inverted time window {window}")),
            });
        }
        if window.is_empty() {
            return Ok(Vec::new());
        }

        let listed =
            match tokio::time::timeout(self.timeout, self.service.list_events(calendar_id, window))
                .await
            {
                Ok(result) => result.map_err(|source| SyncError::Fetch {
                    calendar_id: calendar_id.to_string(),
                    source,
                })?,
                Err(_) => {
                    return Err(SyncError::Fetch {
                        calendar_id: calendar_id.to_string(),
                        source: CalEditError::Timeout(format!(
                            "event listing exceeded {}",
                            humantime::format_duration(self.timeout)
                        )),
                    })
                }
            };

        let listed_count = listed.len();
        let mut events: Vec<CalendarEvent> =
            listed.into_iter().filter(|event| window.contains(event.start_time)).collect();
        events.sort_by_key(|event| event.start_time);

        debug!(listed = listed_count, kept = events.len(), "Fetched events");
        Ok(events)
    }
}
