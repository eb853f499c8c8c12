//! Route table of the control surface

use std::sync::Arc;

use axum::Router;

use crate::commands::{calendar_router, configuration_router, health_router};
use crate::AppContext;

/// Build the control surface over a shared context.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .merge(calendar_router())
        .merge(configuration_router())
        .merge(health_router())
        .with_state(ctx)
}
