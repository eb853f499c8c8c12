//! # Calendar Editor API
//!
//! Application layer - control surface and main entry point.
//!
//! This crate contains:
//! - HTTP handlers over the live configuration and the monitored set
//! - Application context (dependency injection)
//! - Tracing setup
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Owns the process lifecycle of the sync scheduler

pub mod commands;
pub mod context;
pub mod router;
pub mod utils;

// Re-export for convenience
pub use commands::ApiError;
pub use context::*;
pub use router::router;
