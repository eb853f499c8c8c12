//! Live configuration store
//!
//! Holds the editor configuration in memory for the lifetime of the process.
//! The sync engine reads snapshots; the control surface edits it. Nothing is
//! written back to disk.

use std::time::Duration;

use caledit_core::ConfigProvider;
use caledit_domain::{validate_rule, CalEditError, EditorConfig, ReplacementRule, Result};
use parking_lot::RwLock;
use tracing::info;

/// Thread-safe, validated configuration holder
#[derive(Debug)]
pub struct ConfigStore {
    inner: RwLock<EditorConfig>,
}

impl ConfigStore {
    /// Wrap an already validated configuration.
    pub fn new(config: EditorConfig) -> Self {
        Self { inner: RwLock::new(config) }
    }

    pub fn calendar_names(&self) -> Vec<String> {
        self.inner.read().calendar_names.clone()
    }

    /// Add a monitored calendar name. Returns `false` if it was already there.
    ///
    /// # Errors
    /// Returns `CalEditError::InvalidInput` for a blank name.
    pub fn add_calendar(&self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CalEditError::InvalidInput("calendar name must not be empty".into()));
        }
        let added = self.inner.write().add_calendar_name(name);
        if added {
            info!(calendar = %name, "Calendar added to configuration");
        }
        Ok(added)
    }

    /// Remove a monitored calendar name. Returns `false` if it was not there.
    pub fn remove_calendar(&self, name: &str) -> bool {
        let removed = self.inner.write().remove_calendar_name(name.trim());
        if removed {
            info!(calendar = %name, "Calendar removed from configuration");
        }
        removed
    }

    /// Replace the rule and both periods in one step.
    ///
    /// Nothing changes unless the whole update is valid.
    ///
    /// # Errors
    /// Returns `CalEditError::Config` for an invalid rule or a zero period.
    pub fn update_settings(
        &self,
        replacement: ReplacementRule,
        update_period: Duration,
        query_period: Duration,
    ) -> Result<()> {
        validate_rule(&replacement)?;

        let mut guard = self.inner.write();
        let mut candidate = guard.clone();
        candidate.replacement = replacement;
        candidate.update_period = update_period;
        candidate.query_period = query_period;
        candidate.validate()?;
        *guard = candidate;
        drop(guard);

        info!(
            update_period = %humantime::format_duration(update_period),
            query_period = %humantime::format_duration(query_period),
            "Configuration updated"
        );
        Ok(())
    }
}

impl ConfigProvider for ConfigStore {
    fn snapshot(&self) -> EditorConfig {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove_calendar_names() {
        let store = ConfigStore::new(EditorConfig::default());

        assert!(store.add_calendar("Team A").unwrap());
        assert!(!store.add_calendar(" Team A ").unwrap());
        assert!(store.add_calendar("Team B").unwrap());
        assert_eq!(store.calendar_names(), vec!["Team A", "Team B"]);

        assert!(store.remove_calendar("Team A"));
        assert!(!store.remove_calendar("Team A"));
        assert_eq!(store.snapshot().calendar_names, vec!["Team B"]);
    }

    #[test]
    fn blank_calendar_name_is_rejected() {
        let store = ConfigStore::new(EditorConfig::default());
        assert!(matches!(store.add_calendar("   "), Err(CalEditError::InvalidInput(_))));
    }

    #[test]
    fn invalid_settings_leave_config_untouched() {
        let store = ConfigStore::new(EditorConfig::default());
        let before = store.snapshot();

        let result = store.update_settings(
            ReplacementRule::new("TBD", "Spots:"),
            Duration::ZERO,
            Duration::from_secs(60),
        );

        assert!(matches!(result, Err(CalEditError::Config(_))));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn snapshot_is_detached_from_later_updates() {
        let store = ConfigStore::new(EditorConfig::default());
        let snapshot = store.snapshot();

        store
            .update_settings(
                ReplacementRule::new("TBD", "Spots:"),
                Duration::from_secs(3_600),
                Duration::from_secs(30),
            )
            .unwrap();

        assert_eq!(snapshot.query_period, Duration::from_secs(60));
        assert_eq!(store.snapshot().query_period, Duration::from_secs(30));
    }
}
