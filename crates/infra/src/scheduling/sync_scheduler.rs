//! Sync scheduler for the periodic description pass.
//!
//! Runs [`SyncEngine::run_pass`] at a fixed rate of `query_period`, starting
//! with an immediate pass. A pass that overruns its slot is followed by the
//! next one right away; passes never overlap and are never doubled up.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use caledit_core::SyncEngine;
//! use caledit_infra::config::ConfigStore;
//! use caledit_infra::observability::PassMetrics;
//! use caledit_infra::scheduling::{SyncScheduler, SyncSchedulerConfig};
//!
//! # async fn example(engine: Arc<SyncEngine>, store: Arc<ConfigStore>) -> Result<(), Box<dyn std::error::Error>> {
//! let mut scheduler = SyncScheduler::new(
//!     engine,
//!     store,
//!     Arc::new(PassMetrics::new()),
//!     SyncSchedulerConfig::default(),
//! );
//!
//! scheduler.start().await?;
//! // ... application runs ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use caledit_core::{ConfigProvider, PassSummary, SyncEngine};
use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::observability::PassMetrics;
use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Type alias for task handle to avoid complexity warnings
type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

/// Smallest period handed to the interval timer.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Configuration for sync scheduler
#[derive(Debug, Clone)]
pub struct SyncSchedulerConfig {
    /// How long `stop` waits for an in-flight pass before aborting it
    pub join_timeout: Duration,
}

impl Default for SyncSchedulerConfig {
    fn default() -> Self {
        Self { join_timeout: Duration::from_secs(60) }
    }
}

/// Everything the background loop needs, cloned out of the scheduler
#[derive(Clone)]
struct SyncLoopContext {
    engine: Arc<SyncEngine>,
    config: Arc<dyn ConfigProvider>,
    metrics: Arc<PassMetrics>,
}

/// Periodic driver for the sync engine
pub struct SyncScheduler {
    context: SyncLoopContext,
    settings: SyncSchedulerConfig,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl SyncScheduler {
    /// Create a new sync scheduler
    ///
    /// # Arguments
    ///
    /// * `engine` - Pass engine to drive
    /// * `config` - Source of `query_period`, re-read after every pass
    /// * `metrics` - Pass counters
    /// * `settings` - Scheduler configuration
    pub fn new(
        engine: Arc<SyncEngine>,
        config: Arc<dyn ConfigProvider>,
        metrics: Arc<PassMetrics>,
        settings: SyncSchedulerConfig,
    ) -> Self {
        Self {
            context: SyncLoopContext { engine, config, metrics },
            settings,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
        }
    }

    pub fn metrics(&self) -> &Arc<PassMetrics> {
        &self.context.metrics
    }

    /// Start the scheduler
    ///
    /// Spawns a background task that runs one pass immediately and then one
    /// per `query_period`.
    ///
    /// # Errors
    ///
    /// Returns error if scheduler is already running
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        info!("Starting sync scheduler");

        // Fresh token so the scheduler can be restarted after stop
        self.cancellation_token = CancellationToken::new();

        let context = self.context.clone();
        let cancel = self.cancellation_token.clone();

        let handle = tokio::spawn(async move {
            Self::sync_loop(context, cancel).await;
        });

        *self.task_handle.lock().await = Some(handle);

        info!("Sync scheduler started");
        Ok(())
    }

    /// Stop the scheduler gracefully
    ///
    /// Cancels the loop; a pass already in flight may finish, bounded by the
    /// join timeout after which the task is aborted.
    ///
    /// # Errors
    ///
    /// Returns error if scheduler is not running, the join timed out, or the
    /// task panicked
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        info!("Stopping sync scheduler");

        self.cancellation_token.cancel();

        if let Some(mut handle) = self.task_handle.lock().await.take() {
            let join_timeout = self.settings.join_timeout;
            match tokio::time::timeout(join_timeout, &mut handle).await {
                Ok(joined) => {
                    joined.map_err(|err| SchedulerError::TaskJoinFailed(err.to_string()))?
                }
                Err(_) => {
                    warn!(?join_timeout, "Sync pass did not finish in time; aborting");
                    handle.abort();
                    return Err(SchedulerError::Timeout { duration: join_timeout });
                }
            }
        }

        info!("Sync scheduler stopped");
        Ok(())
    }

    /// Check if scheduler is running
    ///
    /// A scheduler is considered running if it has an active task handle that
    /// hasn't finished.
    pub fn is_running(&self) -> bool {
        self.task_handle
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Run a single pass now, independent of the timer.
    pub async fn run_once(&self) -> PassSummary {
        Self::execute_pass(&self.context).await
    }

    /// Background sync loop
    async fn sync_loop(context: SyncLoopContext, cancel: CancellationToken) {
        let mut period = context.config.snapshot().query_period;
        let mut ticker = fixed_rate(Instant::now(), period);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Sync loop cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    Self::execute_pass(&context).await;

                    let next = context.config.snapshot().query_period;
                    if next != period {
                        info!(
                            from = %humantime::format_duration(period),
                            to = %humantime::format_duration(next),
                            "Query period changed; rescheduling"
                        );
                        period = next;
                        ticker = fixed_rate(Instant::now() + period.max(MIN_PERIOD), period);
                    }
                }
            }
        }
    }

    async fn execute_pass(context: &SyncLoopContext) -> PassSummary {
        let started = Instant::now();
        let summary = context.engine.run_pass().await;
        context.metrics.record_pass(&summary, started.elapsed(), Utc::now());
        summary
    }
}

fn fixed_rate(first_tick: Instant, period: Duration) -> Interval {
    let mut interval = tokio::time::interval_at(first_tick, period.max(MIN_PERIOD));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Ensure scheduler is stopped when dropped
impl Drop for SyncScheduler {
    fn drop(&mut self) {
        if self.is_running() && !self.cancellation_token.is_cancelled() {
            warn!("SyncScheduler dropped while running; cancelling");
            self.cancellation_token.cancel();
        }
    }
}
