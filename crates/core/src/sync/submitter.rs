//! Batched description update submitter

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use caledit_domain::{CalEditError, EventUpdate, FailureReason, UpdateOutcome};
use tracing::{instrument, warn};

use super::error::SyncError;
use crate::calendar_ports::CalendarService;

/// Submits all rewrites for one calendar as a single batch
pub struct BatchUpdateSubmitter {
    service: Arc<dyn CalendarService>,
    timeout: Duration,
}

impl BatchUpdateSubmitter {
    pub fn new(service: Arc<dyn CalendarService>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    /// Submit `updates` and return one outcome per event id.
    ///
    /// Never fails as a whole: a batch-level failure marks every item failed,
    /// an item-level failure marks only that item. An empty update list makes
    /// no remote call.
    #[instrument(skip(self, updates), fields(updates = updates.len()))]
    pub async fn submit(
        &self,
        calendar_id: &str,
        updates: &[EventUpdate],
    ) -> BTreeMap<String, UpdateOutcome> {
        if updates.is_empty() {
            return BTreeMap::new();
        }

        let call = self.service.batch_update_descriptions(calendar_id, updates);
        let response = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(CalEditError::Timeout(format!(
                "batch update exceeded {}",
                humantime::format_duration(self.timeout)
            ))),
        };

        let mut response = match response {
            Ok(response) => response,
            Err(source) => {
                let reason = failure_reason(&source);
                let err =
                    SyncError::Submit { calendar_id: calendar_id.to_string(), event_id: None, source };
                warn!(error = %err, "Batch update failed");
                return updates
                    .iter()
                    .map(|update| {
                        (update.event_id.clone(), UpdateOutcome::Failed(reason.clone()))
                    })
                    .collect();
            }
        };

        updates
            .iter()
            .map(|update| {
                let outcome = match response.remove(&update.event_id) {
                    Some(Ok(())) => UpdateOutcome::Updated,
                    Some(Err(source)) => {
                        let reason = failure_reason(&source);
                        let err = SyncError::Submit {
                            calendar_id: calendar_id.to_string(),
                            event_id: Some(update.event_id.clone()),
                            source,
                        };
                        warn!(error = %err, "Event update failed");
                        UpdateOutcome::Failed(reason)
                    }
                    None => {
                        warn!(event_id = %update.event_id, "Batch response has no result for event");
                        UpdateOutcome::Failed(FailureReason::Rejected(
                            "no result returned for this item".to_string(),
                        ))
                    }
                };
                (update.event_id.clone(), outcome)
            })
            .collect()
    }
}

fn failure_reason(err: &CalEditError) -> FailureReason {
    if err.is_transport() {
        FailureReason::Transport(err.to_string())
    } else {
        FailureReason::Rejected(err.to_string())
    }
}
