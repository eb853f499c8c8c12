//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use caledit_core::{CalendarDirectory, CalendarService, ConfigProvider, SyncEngine};
use caledit_domain::{CalEditError, EditorConfig, Result};
use caledit_infra::config::{self, ConfigStore};
use caledit_infra::integrations::google::{
    GoogleCalendarService, StaticTokenProvider, API_BASE_ENV,
};
use caledit_infra::{HttpClient, PassMetrics, SyncScheduler, SyncSchedulerConfig};
use tokio::sync::Mutex;

use crate::utils::health::{ComponentHealth, HealthStatus};

/// Fail-fast bound on scheduler start.
const START_TIMEOUT: Duration = Duration::from_secs(10);

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Arc<ConfigStore>,
    pub calendars: Arc<dyn CalendarService>,
    pub engine: Arc<SyncEngine>,
    pub metrics: Arc<PassMetrics>,
    pub scheduler: Mutex<SyncScheduler>,
}

impl AppContext {
    /// Wire the context around an already validated configuration and a
    /// calendar service. The scheduler is created but not started.
    pub fn new(config: EditorConfig, calendars: Arc<dyn CalendarService>) -> Self {
        let store = Arc::new(ConfigStore::new(config));
        let engine = Arc::new(SyncEngine::new(calendars.clone(), store.clone()));
        let metrics = Arc::new(PassMetrics::new());
        let scheduler = SyncScheduler::new(
            engine.clone(),
            store.clone(),
            metrics.clone(),
            SyncSchedulerConfig::default(),
        );

        Self { config: store, calendars, engine, metrics, scheduler: Mutex::new(scheduler) }
    }

    /// Build the production context from the environment.
    ///
    /// # Errors
    /// Returns `CalEditError::Config` when the configuration does not load or
    /// validate, or when no access token is available.
    pub fn from_environment() -> Result<Self> {
        let config = config::load()?;

        let http = HttpClient::builder().timeout(config.request_timeout).build()?;
        let tokens = Arc::new(StaticTokenProvider::from_env()?);
        let mut google = GoogleCalendarService::new(http, tokens);
        if let Ok(base) = std::env::var(API_BASE_ENV) {
            tracing::info!(base_url = %base, "using overridden Google API base");
            google = google.with_base_url(base);
        }

        Ok(Self::new(config, Arc::new(google)))
    }

    /// Directory over the remote listing, bounded by the configured timeout.
    pub fn directory(&self) -> CalendarDirectory {
        CalendarDirectory::new(self.calendars.clone(), self.config.snapshot().request_timeout)
    }

    /// Start the periodic sync loop.
    ///
    /// # Errors
    /// Returns an error if the scheduler is already running or does not start
    /// in time.
    pub async fn start(&self) -> Result<()> {
        let mut scheduler = self.scheduler.lock().await;
        tokio::time::timeout(START_TIMEOUT, scheduler.start())
            .await
            .map_err(|_| {
                tracing::error!(
                    timeout_secs = START_TIMEOUT.as_secs(),
                    "SyncScheduler start timed out"
                );
                CalEditError::Internal("SyncScheduler start timed out".into())
            })?
            .map_err(|err| {
                tracing::error!(error = %err, "failed to start SyncScheduler");
                CalEditError::from(err)
            })
    }

    /// Stop the periodic sync loop, letting an in-flight pass finish.
    pub async fn shutdown(&self) {
        let mut scheduler = self.scheduler.lock().await;
        if !scheduler.is_running() {
            return;
        }
        if let Err(err) = scheduler.stop().await {
            tracing::warn!(error = %err, "SyncScheduler did not stop cleanly");
        }
    }

    /// Get application health status
    pub async fn health_check(&self) -> HealthStatus {
        let running = self.scheduler.lock().await.is_running();

        let scheduler = if running {
            ComponentHealth::healthy("scheduler")
        } else {
            ComponentHealth::unhealthy("scheduler", "sync loop is not running")
        };

        let configured = self.config.calendar_names();
        let directory = if configured.is_empty() || !self.engine.monitored().is_empty() {
            ComponentHealth::healthy("calendar_directory")
        } else {
            ComponentHealth::unhealthy(
                "calendar_directory",
                "none of the configured calendars is resolved",
            )
        };

        HealthStatus::new(running, self.metrics.snapshot())
            .add_component(scheduler)
            .add_component(directory)
    }
}
