//! `extract` and `recommend` commands.

use crate::extraction::extract;
use crate::models::{PreferenceState, RecommendationStrategy, UniversityRecord};
use crate::ranking::{FuzzyRanker, recommend};
use crate::{Error, Result};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

/// Output of the `recommend` command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendOutput {
    /// How the recommendations were chosen.
    pub strategy: RecommendationStrategy,
    /// Preferences after the utterance.
    pub new_state: PreferenceState,
    /// Recommended universities.
    pub recommendations: Vec<UniversityRecord>,
}

/// Reads a prior state from a JSON file, or returns an empty state.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the file cannot be read and
/// [`Error::InvalidInput`] if it is not a valid state object.
pub fn load_state(path: Option<&Path>) -> Result<PreferenceState> {
    let Some(path) = path else {
        return Ok(PreferenceState::new());
    };

    let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
        operation: "read_state".to_string(),
        cause: format!("{}: {e}", path.display()),
    })?;
    serde_json::from_str(&contents)
        .map_err(|e| Error::InvalidInput(format!("malformed preference state: {e}")))
}

/// Reads reply text from `--reply` or `--reply-file`.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the reply file cannot be read.
pub fn load_reply(inline: Option<String>, file: Option<&Path>) -> Result<Option<String>> {
    if inline.is_some() {
        return Ok(inline);
    }
    file.map(|path| {
        std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_reply".to_string(),
            cause: format!("{}: {e}", path.display()),
        })
    })
    .transpose()
}

/// Runs extraction and the strategy selector for one utterance.
#[must_use]
pub fn build_recommendation(
    ranker: &FuzzyRanker,
    catalogue: &[UniversityRecord],
    utterance: &str,
    prior: &PreferenceState,
    reply: Option<&str>,
) -> RecommendOutput {
    let new_state = extract(utterance, prior);
    let recommendations = recommend(ranker, reply, &new_state, utterance, catalogue);
    RecommendOutput {
        strategy: recommendations.strategy(),
        recommendations: recommendations.to_owned_records(),
        new_state,
    }
}

/// Writes any serializable value as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(value)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Executes the extract command.
///
/// # Errors
///
/// Returns an error if the prior state cannot be loaded or output fails.
pub fn cmd_extract(
    utterance: &str,
    state_path: Option<&Path>,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let prior = load_state(state_path)?;
    let new_state = extract(utterance, &prior);
    write_json(&mut io::stdout().lock(), &new_state)
}

/// Executes the recommend command.
///
/// # Errors
///
/// Returns an error if the prior state cannot be loaded or output fails.
pub fn cmd_recommend(
    ranker: &FuzzyRanker,
    catalogue: &[UniversityRecord],
    utterance: &str,
    state_path: Option<&Path>,
    reply: Option<&str>,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let prior = load_state(state_path)?;
    let output = build_recommendation(ranker, catalogue, utterance, &prior, reply);
    write_json(&mut io::stdout().lock(), &output)
}
