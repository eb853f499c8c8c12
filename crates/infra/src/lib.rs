//! # Calendar Editor Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Configuration loading (files and environment) and the live store
//! - HTTP client implementation
//! - Google Calendar v3 integration (REST listing, batched updates)
//! - The periodic sync scheduler and its pass metrics
//!
//! ## Architecture
//! - Implements traits defined in `caledit-core`
//! - Contains all "impure" code (I/O, clocks, network)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;
pub mod scheduling;

// Re-export commonly used items
pub use config::ConfigStore;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::google::{GoogleCalendarService, StaticTokenProvider};
pub use observability::{PassMetrics, PassMetricsSnapshot};
pub use scheduling::{SchedulerError, SyncScheduler, SyncSchedulerConfig};
