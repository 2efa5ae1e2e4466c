//! Keyword-based preference extraction.
//!
//! Detection is a single pass over [`PREFERENCE_RULES`] plus the grade
//! patterns, and never fails.

use super::rules::{
    A_LEVEL_GRADES, A_LEVEL_TRIGGER, IB_MENTION, IB_POINTS, PREFERENCE_RULES, PreferenceField,
};
use crate::models::PreferenceState;
use std::collections::HashSet;

/// Updates a conversation's preferences from one user utterance.
///
/// Fields the utterance does not mention are carried over from `prior`
/// unchanged; nothing is ever cleared.
///
/// # Arguments
///
/// * `utterance` - The latest user message.
/// * `prior` - The state accumulated over previous turns.
///
/// # Examples
///
/// ```rust
/// use uniguide::extraction::extract;
/// use uniguide::models::{Course, Location, PreferenceState};
///
/// let state = extract("medicine in london please", &PreferenceState::new());
/// assert_eq!(state.location, Some(Location::London));
/// assert_eq!(state.course, Some(Course::Medicine));
/// ```
#[must_use]
pub fn extract(utterance: &str, prior: &PreferenceState) -> PreferenceState {
    let detected = detect_preferences(utterance);

    metrics::counter!("preference_extractions_total").increment(1);
    if !detected.is_empty() {
        tracing::debug!(detected = ?detected, "Preferences detected in utterance");
    }

    prior.clone().merge(detected)
}

/// Detects the preferences stated in a single utterance, ignoring history.
///
/// The returned state only has the fields this utterance sets.
#[must_use]
pub fn detect_preferences(utterance: &str) -> PreferenceState {
    let mut detected = PreferenceState::new();
    if utterance.trim().is_empty() {
        return detected;
    }

    let text_lower = utterance.to_lowercase();
    let mut filled: HashSet<PreferenceField> = HashSet::new();

    for rule in PREFERENCE_RULES {
        let field = rule.value.field();
        if filled.contains(&field) {
            continue;
        }
        if rule.matches(&text_lower) {
            rule.value.apply(&mut detected);
            filled.insert(field);
        }
    }

    detected.predicted_grades = extract_grades(utterance);
    detected
}

/// Extracts predicted grades from an utterance.
///
/// A-level offers take precedence over IB point totals. Returns `None` when
/// no grade pattern is present.
#[must_use]
pub fn extract_grades(utterance: &str) -> Option<String> {
    if A_LEVEL_TRIGGER.is_match(utterance) {
        return A_LEVEL_GRADES
            .find(utterance)
            .map(|m| m.as_str().to_uppercase());
    }

    if let Some(m) = IB_POINTS.find(utterance) {
        return Some(m.as_str().to_string());
    }

    IB_MENTION.is_match(utterance).then(|| "IB".to_string())
}
