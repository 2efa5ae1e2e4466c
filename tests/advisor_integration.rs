//! End-to-end advisor tests against the bundled catalogue.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use uniguide::advisor::{DEFAULT_GREETING, follow_up};
use uniguide::cli::run_chat;
use uniguide::models::{Course, Location};
use uniguide::{
    AdvisorService, Catalogue, Error, FuzzyRanker, LlmProvider, PreferenceState,
    RecommendationStrategy, Result, recommend,
};

/// Returns replies from a script, one per call, and records the prompts.
struct ScriptedProvider {
    replies: Mutex<Vec<String>>,
    systems: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().rev().map(ToString::to_string).collect()),
            systems: Mutex::new(Vec::new()),
        }
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn complete(&self, _prompt: &str) -> Result<String> {
        self.replies
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| Error::OperationFailed {
                operation: "complete".to_string(),
                cause: "script exhausted".to_string(),
            })
    }

    fn complete_with_system(&self, system: &str, user: &str) -> Result<String> {
        self.systems.lock().unwrap().push(system.to_string());
        self.complete(user)
    }
}

fn catalogue() -> Catalogue {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/universities.json");
    Catalogue::load(path).unwrap()
}

#[test]
fn test_medicine_london_nightlife_offline() {
    let advisor = AdvisorService::new(catalogue());
    let response = advisor
        .respond(
            "I want to study medicine in london with great nightlife",
            &PreferenceState::new(),
        )
        .unwrap();

    let state = &response.new_state;
    assert_eq!(state.location, Some(Location::London));
    assert_eq!(state.course, Some(Course::Medicine));
    assert_eq!(state.nightlife, Some(true));
    assert_eq!(response.message, follow_up(state));
    assert!(response.message.contains("with a focus on Nightlife"));

    assert_eq!(response.strategy, RecommendationStrategy::FuzzyMatches);
    assert!(!response.recommendations.is_empty());
    assert!(response.recommendations.len() <= 5);
    for record in &response.recommendations {
        assert!(record.nightlife().is_some_and(|n| n >= 4.0), "{}", record.name);
    }
}

#[test]
fn test_reply_naming_universities_wins_over_ranking() {
    let provider = Arc::new(ScriptedProvider::new(&[
        "For Scotland, have a look at the University of Glasgow or Aberdeen.",
    ]));
    let advisor = AdvisorService::new(catalogue()).with_llm(provider.clone());
    let response = advisor
        .respond("somewhere in scotland", &PreferenceState::new())
        .unwrap();

    assert_eq!(response.strategy, RecommendationStrategy::NamedMatches);
    let names: Vec<&str> = response
        .recommendations
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, vec!["University of Glasgow", "Aberdeen"]);

    let systems = provider.systems.lock().unwrap();
    assert_eq!(systems.len(), 1);
    assert!(systems[0].contains("Current conversation stage:"));
}

#[test]
fn test_reply_without_names_falls_back_to_ranking() {
    let provider = Arc::new(ScriptedProvider::new(&["What would you like to study?"]));
    let advisor = AdvisorService::new(catalogue()).with_llm(provider);
    let response = advisor
        .respond("somewhere in scotland", &PreferenceState::new())
        .unwrap();
    assert_eq!(response.message, "What would you like to study?");
    assert_eq!(response.strategy, RecommendationStrategy::FuzzyMatches);
}

#[test]
fn test_state_carries_across_turns() {
    let provider = Arc::new(ScriptedProvider::new(&["", "Noted."]));
    let advisor = AdvisorService::new(catalogue()).with_llm(provider.clone());

    let first = advisor
        .respond("I'd like to study law", &PreferenceState::new())
        .unwrap();
    assert_eq!(first.message, DEFAULT_GREETING);

    let second = advisor.respond("in wales please", &first.new_state).unwrap();
    assert_eq!(second.new_state.course, Some(Course::Law));
    assert_eq!(second.new_state.location, Some(Location::Wales));

    let systems = provider.systems.lock().unwrap();
    assert!(!systems[0].contains("User Preferences So Far"));
    assert!(systems[1].contains("Course: Law"));
}

#[test]
fn test_blank_message_rejected() {
    let advisor = AdvisorService::new(catalogue());
    let err = advisor.respond("", &PreferenceState::new()).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn test_recommend_without_reply_uses_utterance_query() {
    let catalogue = catalogue();
    let recommendations = recommend(
        &FuzzyRanker::default(),
        None,
        &PreferenceState::new(),
        "University of Leeds",
        catalogue.records(),
    );
    assert_eq!(recommendations.strategy(), RecommendationStrategy::FuzzyMatches);
    assert_eq!(recommendations.records()[0].name, "University of Leeds");
}

#[test]
fn test_chat_session_offline() {
    let advisor = AdvisorService::new(catalogue());
    let input = "scotland\nI want to do engineering\nsport\n/quit\n";
    let mut output = Vec::new();
    let state = run_chat(&advisor, input.as_bytes(), &mut output).unwrap();

    assert_eq!(state.location, Some(Location::Scotland));
    assert_eq!(state.course, Some(Course::Engineering));
    assert_eq!(state.sports, Some(true));

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Great choice looking in Scotland."));
    assert!(text.contains("with a focus on Sports"));
}
