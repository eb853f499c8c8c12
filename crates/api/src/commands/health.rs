//! Health check endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::context::AppContext;
use crate::utils::health::HealthStatus;

pub fn health_router() -> Router<Arc<AppContext>> {
    Router::new().route("/health", get(get_app_health))
}

/// GET /health - Scheduler state and pass metrics
///
/// # Example Response
/// ```json
/// {
///   "isHealthy": true,
///   "running": true,
///   "components": [
///     { "name": "scheduler", "isHealthy": true },
///     { "name": "calendar_directory", "isHealthy": true }
///   ],
///   "metrics": { "passes": 12, "eventsUpdated": 4, "...": "..." },
///   "timestamp": "2024-03-04T09:00:00Z"
/// }
/// ```
pub async fn get_app_health(State(ctx): State<Arc<AppContext>>) -> Json<HealthStatus> {
    Json(ctx.health_check().await)
}
