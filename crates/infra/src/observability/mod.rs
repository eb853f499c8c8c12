//! Observability infrastructure
//!
//! Logging goes through `tracing` everywhere; this module only holds the
//! in-process pass counters exposed by the control surface.

pub mod metrics;

pub use metrics::{PassMetrics, PassMetricsSnapshot};
