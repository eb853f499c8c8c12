//! Metrics collected by the sync scheduler

pub mod pass;

pub use pass::{PassMetrics, PassMetricsSnapshot};
