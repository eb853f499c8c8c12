//! # caledit core
//!
//! Sync logic with no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for the calendar service and configuration source
//! - The replacement policy
//! - Directory resolution, event fetching and batched submission
//! - The pass engine driven by the scheduler
//!
//! ## Architecture Principles
//! - Only depends on `caledit-domain`
//! - No HTTP, file system, or platform code
//! - All external dependencies via traits

pub mod calendar_ports;
pub mod config_ports;
pub mod sync;

pub use calendar_ports::{BatchResponse, CalendarService};
pub use config_ports::ConfigProvider;
pub use sync::{
    decide, BatchUpdateSubmitter, CalendarDirectory, CalendarReport, EventWindowFetcher,
    PassSummary, ReplacementDecision, SyncEngine, SyncError, SyncResult,
};
