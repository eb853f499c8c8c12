//! Shared test helpers for `caledit-core` integration tests.
//!
//! These helpers provide an in-memory calendar service so that sync tests can
//! focus on pass behaviour instead of transport details.

pub mod calendar;

use std::sync::Mutex;

use caledit_core::ConfigProvider;
use caledit_domain::{EditorConfig, ReplacementRule};
use chrono::{DateTime, TimeZone, Utc};

/// Fixed pass start used across tests.
pub fn pass_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).single().expect("valid timestamp")
}

pub const PLACEHOLDER: &str =
    "Registration will open 72 hours before class start time. Class size is ";

/// Config with the registration rule and the given calendar names.
pub fn config_for(names: &[&str]) -> EditorConfig {
    EditorConfig {
        calendar_names: names.iter().map(|name| name.to_string()).collect(),
        replacement: ReplacementRule::new(PLACEHOLDER, "Spots: "),
        ..EditorConfig::default()
    }
}

/// Config provider whose contents tests can swap between passes.
pub struct SharedConfig(Mutex<EditorConfig>);

impl SharedConfig {
    pub fn new(config: EditorConfig) -> Self {
        Self(Mutex::new(config))
    }

    pub fn update(&self, mutate: impl FnOnce(&mut EditorConfig)) {
        mutate(&mut self.0.lock().unwrap());
    }
}

impl ConfigProvider for SharedConfig {
    fn snapshot(&self) -> EditorConfig {
        self.0.lock().unwrap().clone()
    }
}
