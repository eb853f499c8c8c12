//! Google Calendar v3 integration
//!
//! Implements the core `CalendarService` port over the public REST API:
//! calendar list, single-event listing and batched description PATCHes.

pub mod auth;
pub mod batch;
pub mod service;
pub(crate) mod types;

pub use auth::{AccessTokenProvider, StaticTokenProvider, ACCESS_TOKEN_ENV};
pub use batch::MAX_BATCH_CALLS;
pub use service::{GoogleCalendarService, API_BASE_ENV, GOOGLE_API_BASE};
