//! Health report served by `GET /health`
//!
//! Combines the scheduler state, the monitored set and the pass counters.

use caledit_infra::PassMetricsSnapshot;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Overall health of the service
///
/// # Example
/// ```no_run
/// use caledit_api::utils::health::{ComponentHealth, HealthStatus};
/// # fn metrics() -> caledit_infra::PassMetricsSnapshot { unimplemented!() }
///
/// let status = HealthStatus::new(true, metrics())
///     .add_component(ComponentHealth::healthy("scheduler"))
///     .add_component(ComponentHealth::unhealthy("calendar_directory", "nothing resolved"));
///
/// assert!(!status.is_healthy);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// True when every component is healthy
    pub is_healthy: bool,

    /// Whether the periodic scheduler loop is alive
    pub running: bool,

    /// Individual component checks
    pub components: Vec<ComponentHealth>,

    /// Pass counters since startup
    pub metrics: PassMetricsSnapshot,

    pub timestamp: DateTime<Utc>,
}

impl HealthStatus {
    pub fn new(running: bool, metrics: PassMetricsSnapshot) -> Self {
        Self { is_healthy: true, running, components: Vec::new(), metrics, timestamp: Utc::now() }
    }

    /// Add a component check; any unhealthy component makes the whole status
    /// unhealthy.
    pub fn add_component(mut self, component: ComponentHealth) -> Self {
        self.is_healthy &= component.is_healthy;
        self.components.push(component);
        self
    }
}

/// Health status of an individual component
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentHealth {
    /// Component identifier (e.g. "scheduler", "calendar_directory")
    pub name: String,

    pub is_healthy: bool,

    /// Why the component is unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentHealth {
    /// Create a healthy component status
    pub fn healthy(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: true, message: None }
    }

    /// Create an unhealthy component status with a message
    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: false, message: Some(message.into()) }
    }
}
