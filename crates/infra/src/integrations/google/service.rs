//! Google Calendar v3 implementation of [`CalendarService`]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use caledit_core::{BatchResponse, CalendarService};
use caledit_domain::{
    CalEditError, CalendarEvent, EventUpdate, MonitoredCalendar, Result, TimeWindow,
};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::auth::AccessTokenProvider;
use super::batch::{self, PartResponse, MAX_BATCH_CALLS};
use super::types::{error_detail, CalendarListResponse, EventsResponse, GoogleEvent};
use crate::errors::{status_error, InfraError};
use crate::http::HttpClient;

/// Production Google API host.
pub const GOOGLE_API_BASE: &str = "https://www.googleapis.com";

/// Environment variable overriding [`GOOGLE_API_BASE`].
pub const API_BASE_ENV: &str = "CALEDIT_GOOGLE_API_BASE";

const EVENTS_PAGE_SIZE: &str = "250";

/// Google Calendar adapter
pub struct GoogleCalendarService {
    http: HttpClient,
    tokens: Arc<dyn AccessTokenProvider>,
    base_url: String,
}

impl GoogleCalendarService {
    pub fn new(http: HttpClient, tokens: Arc<dyn AccessTokenProvider>) -> Self {
        Self { http, tokens, base_url: GOOGLE_API_BASE.to_string() }
    }

    /// Point the adapter at another host (a mock server in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/calendar/v3{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.http.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &error_detail(&body)));
        }
        response.json::<T>().await.map_err(|err| InfraError::from(err).into())
    }

    async fn send_batch(
        &self,
        token: &str,
        calendar_id: &str,
        chunk: &[EventUpdate],
    ) -> Result<BatchResponse> {
        let boundary = format!("batch_{}", Uuid::new_v4().simple());
        let body = batch::encode_request(&boundary, calendar_id, chunk)?;

        let request = self
            .http
            .request(Method::POST, format!("{}/batch/calendar/v3", self.base_url))
            .bearer_auth(token)
            .header(CONTENT_TYPE, format!("multipart/mixed; boundary={boundary}"))
            .body(body);

        let response = self.http.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &error_detail(&body)));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let text = response.text().await.map_err(|err| CalEditError::from(InfraError::from(err)))?;

        let mut parts: HashMap<String, PartResponse> = batch::decode_response(&content_type, &text)?
            .into_iter()
            .map(|part| (part.content_id.clone(), part))
            .collect();

        Ok(chunk
            .iter()
            .enumerate()
            .map(|(index, update)| {
                let outcome = match parts.remove(&batch::content_id(index)) {
                    Some(part) if part.is_success() => Ok(()),
                    Some(part) => Err(CalEditError::Rejected(format!(
                        "HTTP {}: {}",
                        part.status,
                        error_detail(&part.body)
                    ))),
                    None => Err(CalEditError::Rejected("missing from batch response".into())),
                };
                (update.event_id.clone(), outcome)
            })
            .collect())
    }
}

#[async_trait]
impl CalendarService for GoogleCalendarService {
    #[instrument(skip(self))]
    async fn list_calendars(&self) -> Result<Vec<MonitoredCalendar>> {
        let token = self.tokens.access_token().await?;
        let mut calendars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .request(Method::GET, self.api_url("/users/me/calendarList"))
                .bearer_auth(&token);
            if let Some(page) = &page_token {
                request = request.query(&[("pageToken", page)]);
            }

            let page: CalendarListResponse = self.get_json(request).await?;
            calendars.extend(page.items.into_iter().map(|entry| {
                let display_name = entry.summary.unwrap_or_else(|| entry.id.clone());
                MonitoredCalendar::new(entry.id, display_name)
            }));

            match page.next_page_token {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        debug!(count = calendars.len(), "Listed calendars");
        Ok(calendars)
    }

    #[instrument(skip(self, window), fields(window = %window))]
    async fn list_events(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
    ) -> Result<Vec<CalendarEvent>> {
        let token = self.tokens.access_token().await?;
        let url = self.api_url(&format!("/calendars/{}/events", urlencoding::encode(calendar_id)));
        let time_min = window.start.to_rfc3339_opts(SecondsFormat::Secs, true);
        let time_max = window.end.to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut events = Vec::new();
        let mut skipped = 0usize;
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
                ("timeMin", time_min.clone()),
                ("timeMax", time_max.clone()),
                ("maxResults", EVENTS_PAGE_SIZE.to_string()),
            ];
            if let Some(page) = page_token.take() {
                query.push(("pageToken", page));
            }

            let request = self.http.request(Method::GET, &url).bearer_auth(&token).query(&query);
            let page: EventsResponse = self.get_json(request).await?;

            for raw in page.items {
                match convert_event(raw) {
                    Ok(Some(event)) => events.push(event),
                    Ok(None) => {}
                    Err((event_id, reason)) => {
                        skipped += 1;
                        warn!(%event_id, error = %reason, "Skipping malformed event");
                    }
                }
            }

            match page.next_page_token {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        debug!(count = events.len(), skipped, "Listed events");
        Ok(events)
    }

    #[instrument(skip(self, updates), fields(updates = updates.len()))]
    async fn batch_update_descriptions(
        &self,
        calendar_id: &str,
        updates: &[EventUpdate],
    ) -> Result<BatchResponse> {
        if updates.is_empty() {
            return Ok(BatchResponse::new());
        }

        let token = self.tokens.access_token().await?;
        let mut results = BatchResponse::with_capacity(updates.len());
        let mut first_error = None;
        let mut any_delivered = false;

        for chunk in updates.chunks(MAX_BATCH_CALLS) {
            match self.send_batch(&token, calendar_id, chunk).await {
                Ok(chunk_results) => {
                    any_delivered = true;
                    results.extend(chunk_results);
                }
                Err(err) => {
                    warn!(error = %err, items = chunk.len(), "Batch chunk failed");
                    for update in chunk {
                        results.insert(update.event_id.clone(), Err(err.clone()));
                    }
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) if !any_delivered => Err(err),
            _ => Ok(results),
        }
    }
}

/// Convert one API event. `Ok(None)` drops cancelled instances; `Err` carries
/// the event id and the reason it could not be read.
fn convert_event(raw: GoogleEvent) -> std::result::Result<Option<CalendarEvent>, (String, String)> {
    if raw.status.as_deref() == Some("cancelled") {
        return Ok(None);
    }

    let start = raw.start.ok_or_else(|| (raw.id.clone(), "missing start".to_string()))?;
    let start_time = match (start.date_time, start.date) {
        (Some(value), _) => parse_event_timestamp(&value),
        (None, Some(value)) => parse_all_day_timestamp(&value),
        (None, None) => Err("start has neither dateTime nor date".to_string()),
    }
    .map_err(|reason| (raw.id.clone(), reason))?;

    Ok(Some(CalendarEvent {
        id: raw.id,
        title: raw.summary.unwrap_or_default(),
        start_time,
        description: raw.description,
    }))
}

fn parse_all_day_timestamp(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    let date = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("invalid all-day date '{value}': {e}"))?;

    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
        format!("invalid all-day date '{value}': could not derive midnight timestamp")
    })?;

    Ok(midnight.and_utc())
}

fn parse_event_timestamp(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    let trimmed = value.trim();
    let has_explicit_timezone = trimmed.ends_with('Z')
        || trimmed
            .rfind('T')
            .is_some_and(|idx| trimmed[idx + 1..].chars().any(|c| matches!(c, '+' | '-')));

    let candidate = if has_explicit_timezone { trimmed.to_string() } else { format!("{trimmed}Z") };

    DateTime::parse_from_rfc3339(&candidate)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid timestamp '{value}': {e}"))
}
