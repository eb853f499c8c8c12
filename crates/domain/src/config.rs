//! Editor configuration model
//!
//! The configuration is read as a whole snapshot at the start of every pass,
//! so every field here is plain data. Durations are written in a
//! human-readable form (`"3days"`, `"90s"`, `"1m"`) in config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{CalEditError, Result};
use crate::types::ReplacementRule;

/// Placeholder text carried by events whose registration is not open yet.
pub const DEFAULT_ORIGINAL_TEXT: &str =
    "Registration will open 72 hours before class start time. Class size is ";
/// Text written in place of [`DEFAULT_ORIGINAL_TEXT`].
pub const DEFAULT_REPLACEMENT_TEXT: &str = "Spots:";
/// How far ahead of an event's start its description is rewritten.
pub const DEFAULT_UPDATE_PERIOD: Duration = Duration::from_secs(3 * 24 * 60 * 60);
/// Time between two pass starts.
pub const DEFAULT_QUERY_PERIOD: Duration = Duration::from_secs(60);
/// Upper bound on any single remote call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Longest accepted update or query period.
pub const MAX_PERIOD: Duration = Duration::from_secs(365 * 24 * 60 * 60);
/// Calendars processed concurrently within one pass.
pub const DEFAULT_MAX_CONCURRENT_CALENDARS: usize = 4;

impl Default for ReplacementRule {
    fn default() -> Self {
        Self::new(DEFAULT_ORIGINAL_TEXT, DEFAULT_REPLACEMENT_TEXT)
    }
}

/// Process-wide editor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Display names of the calendars to monitor, in priority order.
    pub calendar_names: Vec<String>,
    pub replacement: ReplacementRule,
    #[serde(with = "duration_str")]
    pub update_period: Duration,
    #[serde(with = "duration_str")]
    pub query_period: Duration,
    #[serde(with = "duration_str")]
    pub request_timeout: Duration,
    pub max_concurrent_calendars: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            calendar_names: Vec::new(),
            replacement: ReplacementRule::default(),
            update_period: DEFAULT_UPDATE_PERIOD,
            query_period: DEFAULT_QUERY_PERIOD,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_concurrent_calendars: DEFAULT_MAX_CONCURRENT_CALENDARS,
        }
    }
}

impl EditorConfig {
    /// Check the invariants the sync engine relies on.
    ///
    /// # Errors
    /// Returns `CalEditError::Config` describing the first violated rule.
    pub fn validate(&self) -> Result<()> {
        validate_period("update_period", self.update_period)?;
        validate_period("query_period", self.query_period)?;
        if self.request_timeout.is_zero() {
            return Err(CalEditError::Config("request_timeout must be greater than zero".into()));
        }
        if self.max_concurrent_calendars == 0 {
            return Err(CalEditError::Config(
                "max_concurrent_calendars must be at least 1".into(),
            ));
        }
        validate_rule(&self.replacement)
    }

    /// Add a calendar name unless it is already configured.
    ///
    /// Returns `true` when the name was added.
    pub fn add_calendar_name(&mut self, name: &str) -> bool {
        if self.calendar_names.iter().any(|existing| existing == name) {
            return false;
        }
        self.calendar_names.push(name.to_string());
        true
    }

    /// Remove every occurrence of a calendar name.
    ///
    /// Returns `true` when something was removed.
    pub fn remove_calendar_name(&mut self, name: &str) -> bool {
        let before = self.calendar_names.len();
        self.calendar_names.retain(|existing| existing != name);
        before != self.calendar_names.len()
    }
}

fn validate_period(field: &str, period: Duration) -> Result<()> {
    if period.is_zero() {
        return Err(CalEditError::Config(format!("{field} must be greater than zero")));
    }
    if period > MAX_PERIOD {
        return Err(CalEditError::Config(format!(
            "{field} must be at most {}",
            humantime::format_duration(MAX_PERIOD)
        )));
    }
    Ok(())
}

/// Validate a replacement rule on its own.
///
/// Rejects an empty `original_text`, and any non-empty `replacement_text`
/// that could produce `original_text` again: by containing it, by being
/// contained in it, or by overlapping its start or end with a proper suffix
/// or prefix. A rewritten description then never matches on a later pass.
///
/// An empty `replacement_text` deletes the match and is accepted, although
/// the text on both sides of a deletion can join into a new match.
///
/// # Errors
/// Returns `CalEditError::Config` if the rule is unusable.
pub fn validate_rule(rule: &ReplacementRule) -> Result<()> {
    let original = rule.original_text.as_str();
    let replacement = rule.replacement_text.as_str();

    if original.is_empty() {
        return Err(CalEditError::Config("original_text must not be empty".into()));
    }
    if replacement.contains(original) {
        return Err(CalEditError::Config(
            "replacement_text must not contain original_text".into(),
        ));
    }
    let recreates = original.contains(replacement) || overlaps(original, replacement);
    if !replacement.is_empty() && recreates {
        return Err(CalEditError::Config(
            "replacement_text can recreate original_text with surrounding text".into(),
        ));
    }
    Ok(())
}

/// Whether a proper suffix of `replacement` starts `original`, or a proper
/// prefix of `replacement` ends it.
fn overlaps(original: &str, replacement: &str) -> bool {
    replacement.char_indices().skip(1).any(|(at, _)| {
        original.starts_with(&replacement[at..]) || original.ends_with(&replacement[..at])
    })
}

/// Parse a human-readable period such as `"3days"` or `"90s"`.
///
/// # Errors
/// Returns `CalEditError::Config` naming `field` when the text cannot be
/// parsed.
pub fn parse_period(field: &str, value: &str) -> Result<Duration> {
    humantime::parse_duration(value.trim())
        .map_err(|e| CalEditError::Config(format!("Invalid {field} '{value}': {e}")))
}

mod duration_str {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(raw.trim()).map_err(serde::de::Error::custom)
    }
}
