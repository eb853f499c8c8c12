//! Description rewrite decision.
//!
//! Matching is a literal substring search; the configured text is never
//! interpreted as a pattern.

use caledit_domain::ReplacementRule;

/// What a pass should do with one event description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplacementDecision {
    /// Leave the event alone.
    Skip,
    /// Submit this description instead of the current one.
    Rewrite(String),
}

/// Decide whether `description` needs rewriting under `rule`.
///
/// Every literal occurrence of `rule.original_text` is replaced. Absent
/// descriptions, descriptions without the placeholder, and rules with an
/// empty `original_text` are skipped.
pub fn decide(description: Option<&str>, rule: &ReplacementRule) -> ReplacementDecision {
    let original = rule.original_text.as_str();
    match description {
        Some(text) if !original.is_empty() && text.contains(original) => {
            ReplacementDecision::Rewrite(text.replace(original, &rule.replacement_text))
        }
        _ => ReplacementDecision::Skip,
    }
}
