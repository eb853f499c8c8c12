//! Calendar selection endpoints

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use caledit_domain::MonitoredCalendar;
use tracing::info;

use crate::commands::ApiError;
use crate::utils::logging::log_command_execution;
use crate::AppContext;

pub fn calendar_router() -> Router<Arc<AppContext>> {
    Router::new()
        .route("/calendars", get(list_calendars).post(add_calendar))
        .route("/calendars/available", get(available_calendars))
        .route("/calendars/monitored", get(monitored_calendars))
        .route("/calendars/{name}", delete(delete_calendar))
}

/// GET /calendars/available - Display names of every calendar the account sees
pub async fn available_calendars(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Vec<String>>, ApiError> {
    let command_name = "calendar::available_calendars";
    let start = Instant::now();

    let result = ctx.directory().available().await;
    log_command_execution(command_name, start.elapsed(), result.is_ok());

    let names = result?.into_iter().map(|calendar| calendar.display_name).collect();
    Ok(Json(names))
}

/// GET /calendars - Configured calendar names
pub async fn list_calendars(State(ctx): State<Arc<AppContext>>) -> Json<Vec<String>> {
    Json(ctx.config.calendar_names())
}

/// POST /calendars - Add a calendar name given as the plain-text body
///
/// Answers `201 Created` when the name was added and `200 OK` when it was
/// already configured; the body is the resulting list either way.
pub async fn add_calendar(
    State(ctx): State<Arc<AppContext>>,
    body: String,
) -> Result<(StatusCode, Json<Vec<String>>), ApiError> {
    let command_name = "calendar::add_calendar";
    let start = Instant::now();

    let result = ctx.config.add_calendar(&body);
    log_command_execution(command_name, start.elapsed(), result.is_ok());

    let status = if result? { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(ctx.config.calendar_names())))
}

/// DELETE /calendars/{name} - Stop monitoring a calendar name
pub async fn delete_calendar(
    State(ctx): State<Arc<AppContext>>,
    Path(name): Path<String>,
) -> StatusCode {
    let command_name = "calendar::delete_calendar";
    let start = Instant::now();

    let removed = ctx.config.remove_calendar(&name);
    log_command_execution(command_name, start.elapsed(), removed);

    if removed {
        StatusCode::NO_CONTENT
    } else {
        info!(calendar = %name, "Calendar was not configured");
        StatusCode::NOT_FOUND
    }
}

/// GET /calendars/monitored - Calendars resolved at the last pass boundary
pub async fn monitored_calendars(
    State(ctx): State<Arc<AppContext>>,
) -> Json<Vec<MonitoredCalendar>> {
    Json(ctx.engine.monitored().to_vec())
}
