//! Offline follow-up questions.
//!
//! Without a model, the reply asks for the most important missing preference.

use crate::models::PreferenceState;

/// Reply used when a model returns nothing.
pub const DEFAULT_GREETING: &str =
    "I'm here to help you find the perfect university! What are you most interested in studying?";

/// Composes a follow-up message from the accumulated preferences.
///
/// Asks for location first, then course, then interests. Once those are
/// known, summarizes the focus of the search.
#[must_use]
pub fn follow_up(state: &PreferenceState) -> String {
    let Some(location) = state.location else {
        return "I've found some great universities for you. To narrow it down, \
                **where in the UK would you prefer to study?** \
                (e.g., London, Scotland, near the coast?)"
            .to_string();
    };

    let Some(course) = state.course else {
        return format!(
            "Great choice looking in {location}. **What subject are you planning to study?**"
        );
    };

    if state.vibe.is_none() && !state.wants_sports() && !state.wants_nightlife() {
        return format!(
            "I've found some {course} courses in {location}. \
             **What's more important to you: Sports facilities, Nightlife, or a Creative vibe?**"
        );
    }

    let mut focus: Vec<String> = Vec::new();
    if state.wants_sports() {
        focus.push("Sports".to_string());
    }
    if state.wants_nightlife() {
        focus.push("Nightlife".to_string());
    }
    if let Some(vibe) = state.vibe {
        focus.push(format!("{vibe} vibe"));
    }

    format!(
        "Here are the best matches for {course} in {location} with a focus on {}. \
         **Is there anything else specific you're looking for?**",
        focus.join(", ")
    )
}
