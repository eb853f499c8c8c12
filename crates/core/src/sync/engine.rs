//! Sync pass orchestration
//!
//! One pass: snapshot the config, compute the window, make sure the monitored
//! set matches the configured names, then process every calendar with
//! bounded concurrency. Calendars never share mutable state; each task hands
//! back its own [`CalendarReport`].

use std::collections::BTreeMap;
use std::sync::Arc;

use caledit_domain::{EditorConfig, EventUpdate, MonitoredCalendar, TimeWindow, UpdateOutcome};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use parking_lot::RwLock;
use tracing::{debug, error, info, instrument, warn};

use super::directory::CalendarDirectory;
use super::error::SyncError;
use super::fetcher::EventWindowFetcher;
use super::replacement::{decide, ReplacementDecision};
use super::report::{CalendarReport, PassSummary};
use super::submitter::BatchUpdateSubmitter;
use crate::calendar_ports::CalendarService;
use crate::config_ports::ConfigProvider;

/// The resolved monitored set and the names it was resolved from.
///
/// `resolved_from == None` means the set is unresolved and the next pass has
/// to ask the directory again.
struct MonitoredSet {
    calendars: Arc<[MonitoredCalendar]>,
    resolved_from: Option<Vec<String>>,
}

impl MonitoredSet {
    fn unresolved() -> Self {
        Self { calendars: Arc::from(Vec::new()), resolved_from: None }
    }

    fn is_current(&self, names: &[String]) -> bool {
        self.resolved_from.as_deref() == Some(names)
    }
}

/// Runs sync passes against a [`CalendarService`]
pub struct SyncEngine {
    service: Arc<dyn CalendarService>,
    config: Arc<dyn ConfigProvider>,
    monitored: RwLock<MonitoredSet>,
}

impl SyncEngine {
    pub fn new(service: Arc<dyn CalendarService>, config: Arc<dyn ConfigProvider>) -> Self {
        Self { service, config, monitored: RwLock::new(MonitoredSet::unresolved()) }
    }

    /// Calendars synced by the most recent pass.
    pub fn monitored(&self) -> Arc<[MonitoredCalendar]> {
        Arc::clone(&self.monitored.read().calendars)
    }

    /// Force the next pass to re-resolve the monitored set.
    pub fn invalidate_monitored(&self) {
        *self.monitored.write() = MonitoredSet::unresolved();
    }

    /// Run one pass with the window starting now.
    pub async fn run_pass(&self) -> PassSummary {
        self.run_pass_at(Utc::now()).await
    }

    /// Run one pass with the window starting at `now`.
    #[instrument(skip(self), fields(started_at = %now))]
    pub async fn run_pass_at(&self, now: DateTime<Utc>) -> PassSummary {
        let config = self.config.snapshot();

        let window = match TimeWindow::starting_at(now, config.update_period) {
            Ok(window) => window,
            Err(err) => {
                let err = SyncError::Configuration(err.to_string());
                error!(error = %err, "Sync pass aborted");
                return PassSummary::aborted(now, err);
            }
        };

        let calendars = self.refresh_monitored(&config).await;
        if calendars.is_empty() {
            debug!("No monitored calendars");
        }

        let concurrency = config.max_concurrent_calendars.max(1);
        let reports: Vec<CalendarReport> = stream::iter(calendars.iter().cloned())
            .map(|calendar| self.sync_calendar(calendar, &config, window))
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let summary = PassSummary { started_at: now, window: Some(window), calendars: reports, error: None };
        info!(
            window = %window,
            calendars = summary.calendars.len(),
            updated = summary.updated(),
            unchanged = summary.unchanged(),
            failed = summary.failed_items(),
            failed_calendars = summary.failed_calendars(),
            "sync pass completed"
        );
        summary
    }

    /// Return the monitored set for `config`, re-resolving it when it is
    /// unresolved or the configured names changed.
    ///
    /// The new set replaces the old one wholesale; readers never see a mix.
    async fn refresh_monitored(&self, config: &EditorConfig) -> Arc<[MonitoredCalendar]> {
        {
            let current = self.monitored.read();
            if current.is_current(&config.calendar_names) {
                return Arc::clone(&current.calendars);
            }
        }

        let directory = CalendarDirectory::new(Arc::clone(&self.service), config.request_timeout);
        let next = match directory.try_resolve(&config.calendar_names).await {
            Ok(calendars) => {
                info!(
                    configured = config.calendar_names.len(),
                    resolved = calendars.len(),
                    "Monitored calendars resolved"
                );
                MonitoredSet {
                    calendars: Arc::from(calendars),
                    resolved_from: Some(config.calendar_names.clone()),
                }
            }
            Err(err) => {
                warn!(error = %err, "Monitored set unresolved, retrying next pass");
                MonitoredSet::unresolved()
            }
        };

        let calendars = Arc::clone(&next.calendars);
        *self.monitored.write() = next;
        calendars
    }

    #[instrument(skip_all, fields(calendar = %calendar.display_name, calendar_id = %calendar.id))]
    async fn sync_calendar(
        &self,
        calendar: MonitoredCalendar,
        config: &EditorConfig,
        window: TimeWindow,
    ) -> CalendarReport {
        let fetcher = EventWindowFetcher::new(Arc::clone(&self.service), config.request_timeout);
        let events = match fetcher.fetch(&calendar.id, &window).await {
            Ok(events) => events,
            Err(err) => {
                warn!(error = %err, "Skipping calendar for this pass");
                return CalendarReport::failed(calendar, err);
            }
        };

        if events.is_empty() {
            info!("No upcoming events found");
        }

        let mut outcomes = BTreeMap::new();
        let mut updates = Vec::new();
        for event in &events {
            match decide(event.description.as_deref(), &config.replacement) {
                ReplacementDecision::Skip => {
                    outcomes.insert(event.id.clone(), UpdateOutcome::Unchanged);
                }
                ReplacementDecision::Rewrite(description) => {
                    debug!(event_id = %event.id, title = %event.title, "Queued description rewrite");
                    updates.push(EventUpdate::new(event.id.clone(), description));
                }
            }
        }

        let submitter = BatchUpdateSubmitter::new(Arc::clone(&self.service), config.request_timeout);
        outcomes.extend(submitter.submit(&calendar.id, &updates).await);

        let report = CalendarReport::completed(calendar, outcomes);
        info!(
            events = events.len(),
            updated = report.updated(),
            unchanged = report.unchanged(),
            failed = report.failed_items(),
            "Calendar processed"
        );
        report
    }
}
