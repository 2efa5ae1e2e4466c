//! System prompt for model-backed replies.
//!
//! The prompt embeds a compact JSON summary of the first few catalogue records,
//! the conversation guidelines, and what is already known about the student.

use crate::models::{PreferenceState, UniversityRecord};
use serde::Serialize;

/// Placeholder for missing values.
const NOT_AVAILABLE: &str = "N/A";

/// Characters of the description kept per record.
const DESCRIPTION_CHARS: usize = 300;

/// Characters of the entry requirements kept per record.
const ENTRY_REQUIREMENTS_CHARS: usize = 150;

const PERSONA: &str = "You are an expert UK university advisor helping a prospective student \
choose where to apply.

You have detailed information about each university, including league table \
rankings (Guardian, THE World Rankings, NSS satisfaction), typical offers, \
accommodation, cost of living, nightlife and campus vibe, sports rankings, \
the share of international students, and travel links.";

const GUIDELINES: &str = "CONVERSATION GUIDELINES:
1. Ask ONE focused question at a time, in this order:
   - the subject they want to study
   - their predicted or achieved grades (A-levels, IB, BTECs)
   - where in the UK they want to live
   - campus vibe, sports and nightlife
2. Be warm, conversational and encouraging.
3. When recommending, give 2-3 specific details from the database for EACH university \
(rankings, typical offers, vibe, nightlife rating, international share) and explain \
why it fits. Compare their grades with the entry requirements.
4. End recommendations with \"You can explore these universities in detail below!\" \
and then ask 1-2 questions that would refine the search further, such as cost of \
living, accommodation plans, student satisfaction or employability.
5. Only give 3-5 recommendations once you know the subject, grades and location.
6. Keep it concise: 2-3 sentences per university.

NEVER invent information. Only use the data provided above.";

/// One catalogue record as shown to the model.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordSummary<'a> {
    name: &'a str,
    location: &'a str,
    description: String,
    features: String,
    rankings: String,
    cost_of_living: &'static str,
    nightlife: String,
    vibe: &'a str,
    sports_ranking: String,
    international_students: String,
    entry_requirements: String,
    slug: &'a str,
}

impl<'a> RecordSummary<'a> {
    fn from_record(record: &'a UniversityRecord) -> Self {
        let rankings = &record.rankings;
        Self {
            name: &record.name,
            location: &record.location,
            description: truncate_or(&record.description, DESCRIPTION_CHARS, "No description available"),
            features: if record.features.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                record.features.join(", ")
            },
            rankings: format!(
                "Guardian: {}, THE World: {}, NSS: {}%",
                or_na(rankings.guardian.map(|v| v.to_string())),
                or_na(rankings.the.map(|v| v.to_string())),
                or_na(rankings.nss.map(format_number)),
            ),
            cost_of_living: record
                .location_stats
                .cost_of_living
                .map_or(NOT_AVAILABLE, |c| c.as_str()),
            nightlife: format!("{}/5", or_na(record.nightlife().map(format_number))),
            vibe: record.vibe().unwrap_or(NOT_AVAILABLE),
            sports_ranking: or_na(record.campus_stats.sports_ranking.map(|v| v.to_string())),
            international_students: record
                .campus_stats
                .international_students
                .map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{}%", format_number(v))),
            entry_requirements: truncate_or(
                record.entry_requirements.as_deref().unwrap_or_default(),
                ENTRY_REQUIREMENTS_CHARS,
                "Varies by course",
            ),
            slug: &record.slug,
        }
    }
}

/// Which question the model should ask next, by number of known preferences.
#[must_use]
pub fn conversation_stage(known_preferences: usize) -> &'static str {
    match known_preferences {
        0 => "Just starting - ask what subject they want to study",
        1 => "Ask about their predicted or achieved grades (A-levels, IB, BTECs, etc.)",
        2 => "Ask about location preference in the UK",
        _ => "Ask follow-up questions or make specific recommendations with data",
    }
}

/// Builds the system prompt.
///
/// `sample` is how many catalogue records to summarize; the remainder is only
/// counted.
#[must_use]
pub fn build_system_prompt(
    state: &PreferenceState,
    catalogue: &[UniversityRecord],
    sample: usize,
) -> String {
    let shown: Vec<RecordSummary<'_>> = catalogue
        .iter()
        .take(sample)
        .map(RecordSummary::from_record)
        .collect();
    let knowledge = serde_json::to_string_pretty(&shown).unwrap_or_else(|_| "[]".to_string());
    let remaining = catalogue.len().saturating_sub(shown.len());

    let preferences = state.summary_lines();

    let mut prompt = String::with_capacity(knowledge.len() + 2048);
    prompt.push_str(PERSONA);
    prompt.push_str("\n\nYOUR UNIVERSITY DATABASE (use this information when making recommendations):\n");
    prompt.push_str(&knowledge);
    if remaining > 0 {
        prompt.push_str(&format!(
            "\n... and {remaining} more universities with similar detailed data."
        ));
    }
    prompt.push_str("\n\n");
    prompt.push_str(GUIDELINES);
    prompt.push_str("\n\nCurrent conversation stage: ");
    prompt.push_str(conversation_stage(preferences.len()));
    if !preferences.is_empty() {
        prompt.push_str("\n\nUser Preferences So Far:\n");
        prompt.push_str(&preferences.join("\n"));
    }
    prompt
}

fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Whole numbers print without a fractional part.
fn format_number(value: f32) -> String {
    if value.fract().abs() < f32::EPSILON {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

fn truncate_or(text: &str, max_chars: usize, fallback: &str) -> String {
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}
