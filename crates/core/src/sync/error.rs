//! Sync error taxonomy
//!
//! Every variant is contained at the smallest scope it belongs to (item,
//! calendar, pass); none of them stops the scheduler loop.

use caledit_domain::CalEditError;
use thiserror::Error;

/// Errors raised while resolving, fetching or submitting during a pass
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// The remote calendar listing failed; the monitored set stays unresolved.
    #[error("Failed to resolve monitored calendars: {source}")]
    DirectoryResolution { source: CalEditError },

    /// One calendar's event listing failed; that calendar is skipped this pass.
    #[error("Failed to fetch events for calendar {calendar_id}: {source}")]
    Fetch { calendar_id: String, source: CalEditError },

    /// A whole batch (`event_id == None`) or a single item failed.
    #[error("Failed to submit {} on calendar {calendar_id}: {source}", event_label(.event_id))]
    Submit { calendar_id: String, event_id: Option<String>, source: CalEditError },

    /// Malformed or missing configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SyncError {
    /// Underlying domain error, when there is one.
    #[must_use]
    pub fn domain_error(&self) -> Option<&CalEditError> {
        match self {
            Self::DirectoryResolution { source }
            | Self::Fetch { source, .. }
            | Self::Submit { source, .. } => Some(source),
            Self::Configuration(_) => None,
        }
    }
}

fn event_label(event_id: &Option<String>) -> String {
    match event_id {
        Some(id) => format!("event {id}"),
        None => "batch".to_string(),
    }
}

/// Convenience type alias for sync operations
pub type SyncResult<T> = Result<T, SyncError>;
