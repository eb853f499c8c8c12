//! Calendar directory: maps configured display names to calendar ids

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use caledit_domain::{CalEditError, MonitoredCalendar};
use tracing::{debug, instrument, warn};

use super::error::{SyncError, SyncResult};
use crate::calendar_ports::CalendarService;

/// Resolves configured calendar names against the account's calendar list
pub struct CalendarDirectory {
    service: Arc<dyn CalendarService>,
    timeout: Duration,
}

impl CalendarDirectory {
    pub fn new(service: Arc<dyn CalendarService>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    /// Every calendar the account can see, as reported by the service.
    pub async fn available(&self) -> SyncResult<Vec<MonitoredCalendar>> {
        match tokio::time::timeout(self.timeout, self.service.list_calendars()).await {
            Ok(Ok(calendars)) => Ok(calendars),
            Ok(Err(source)) => Err(SyncError::DirectoryResolution { source }),
            Err(_) => Err(SyncError::DirectoryResolution {
                source: CalEditError::Timeout(format!(
                    "calendar listing exceeded {}",
                    humanize(self.timeout)
                )),
            }),
        }
    }

    /// Resolve `names`, surfacing a listing failure to the caller.
    #[instrument(skip(self), fields(configured = names.len()))]
    pub async fn try_resolve(&self, names: &[String]) -> SyncResult<Vec<MonitoredCalendar>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let available = self.available().await?;
        Ok(select_calendars(names, &available))
    }

    /// Resolve `names`; a listing failure is logged and yields an empty set.
    pub async fn resolve(&self, names: &[String]) -> Vec<MonitoredCalendar> {
        match self.try_resolve(names).await {
            Ok(calendars) => calendars,
            Err(err) => {
                warn!(error = %err, "Calendar directory unavailable, monitoring nothing this pass");
                Vec::new()
            }
        }
    }
}

/// Pick the calendars whose display name is configured.
///
/// Output follows the order of `names`. Names with no matching calendar are
/// logged and skipped. When several calendars share a display name the last
/// one listed wins. A calendar id appears at most once.
pub fn select_calendars(
    names: &[String],
    available: &[MonitoredCalendar],
) -> Vec<MonitoredCalendar> {
    let by_name: HashMap<&str, &MonitoredCalendar> =
        available.iter().map(|calendar| (calendar.display_name.as_str(), calendar)).collect();

    let mut seen_ids = HashSet::new();
    let mut selected = Vec::with_capacity(names.len());

    for name in names {
        match by_name.get(name.as_str()) {
            Some(calendar) if seen_ids.insert(calendar.id.clone()) => {
                debug!(calendar = %name, calendar_id = %calendar.id, "Resolved calendar");
                selected.push((*calendar).clone());
            }
            Some(_) => {}
            None => warn!(calendar = %name, "Configured calendar not found in account"),
        }
    }

    selected
}

fn humanize(duration: Duration) -> String {
    humantime::format_duration(duration).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn selects_configured_names_in_order() {
        let available = vec![
            MonitoredCalendar::new("id-a", "Team A"),
            MonitoredCalendar::new("id-b", "Team B"),
            MonitoredCalendar::new("id-c", "Team C"),
        ];

        let selected = select_calendars(&names(&["Team C", "Team A"]), &available);

        assert_eq!(
            selected,
            vec![MonitoredCalendar::new("id-c", "Team C"), MonitoredCalendar::new("id-a", "Team A")]
        );
    }

    #[test]
    fn unknown_names_are_skipped() {
        let available = vec![MonitoredCalendar::new("id-a", "Team A")];
        let selected = select_calendars(&names(&["Team A", "Team Z"]), &available);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "id-a");
    }

    #[test]
    fn later_duplicate_display_name_wins() {
        let available = vec![
            MonitoredCalendar::new("old", "Classes"),
            MonitoredCalendar::new("new", "Classes"),
        ];
        let selected = select_calendars(&names(&["Classes"]), &available);
        assert_eq!(selected, vec![MonitoredCalendar::new("new", "Classes")]);
    }

    #[test]
    fn repeated_name_yields_one_calendar() {
        let available = vec![MonitoredCalendar::new("id-a", "Team A")];
        let selected = select_calendars(&names(&["Team A", "Team A"]), &available);
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn empty_configuration_selects_nothing() {
        let available = vec![MonitoredCalendar::new("id-a", "Team A")];
        assert!(select_calendars(&[], &available).is_empty());
    }
}
