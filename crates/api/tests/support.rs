//! Shared helpers for control surface tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use caledit_api::{router, AppContext};
use caledit_core::{BatchResponse, CalendarService};
use caledit_domain::{
    CalEditError, CalendarEvent, EditorConfig, EventUpdate, MonitoredCalendar, Result, TimeWindow,
};
use tower::ServiceExt;

/// Calendar service with a fixed listing and no events.
#[derive(Default)]
pub struct StubCalendars {
    calendars: Vec<MonitoredCalendar>,
    listing_fails: AtomicBool,
    listings: AtomicUsize,
}

impl StubCalendars {
    pub fn with(calendars: &[(&str, &str)]) -> Self {
        Self {
            calendars: calendars
                .iter()
                .map(|(id, name)| MonitoredCalendar::new(*id, *name))
                .collect(),
            ..Self::default()
        }
    }

    pub fn set_listing_fails(&self, fails: bool) {
        self.listing_fails.store(fails, Ordering::SeqCst);
    }

    pub fn listings(&self) -> usize {
        self.listings.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CalendarService for StubCalendars {
    async fn list_calendars(&self) -> Result<Vec<MonitoredCalendar>> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        if self.listing_fails.load(Ordering::SeqCst) {
            return Err(CalEditError::Network("connection reset".into()));
        }
        Ok(self.calendars.clone())
    }

    async fn list_events(
        &self,
        _calendar_id: &str,
        _window: &TimeWindow,
    ) -> Result<Vec<CalendarEvent>> {
        Ok(Vec::new())
    }

    async fn batch_update_descriptions(
        &self,
        _calendar_id: &str,
        _updates: &[EventUpdate],
    ) -> Result<BatchResponse> {
        Ok(BatchResponse::new())
    }
}

/// Context over the stub with the given configured names.
pub fn context(stub: Arc<StubCalendars>, names: &[&str]) -> Arc<AppContext> {
    let config = EditorConfig {
        calendar_names: names.iter().map(|name| name.to_string()).collect(),
        ..EditorConfig::default()
    };
    Arc::new(AppContext::new(config, stub))
}

/// Send one request through the router and return status and body text.
pub async fn send(ctx: &Arc<AppContext>, request: Request<Body>) -> (u16, String) {
    let response: Response<Body> =
        router(ctx.clone()).oneshot(request).await.expect("router is infallible");
    let status = response.status().as_u16();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, String::from_utf8(bytes.to_vec()).expect("utf-8 body"))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

pub fn post_text(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "text/plain")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::delete(uri).body(Body::empty()).expect("request")
}
