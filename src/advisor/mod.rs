//! Per-turn conversation orchestration.
//!
//! # Turn Flow
//!
//! ```text
//! message ──► extract(message, prior) ──► new state
//!    │
//!    ├─ model configured ──► system prompt (prior state) ──► model reply
//!    │                                                          │
//!    │                                          name mentions? ─┴─► NamedMatches
//!    │                                                          └─► FuzzyMatches
//!    │
//!    └─ no model ──► heuristic follow-up (new state) ──► FuzzyMatches
//! ```
//!
//! The service itself holds no conversation state; callers pass the prior
//! [`PreferenceState`] in and keep the returned one.

mod heuristic;
mod prompt;

pub use heuristic::{DEFAULT_GREETING, follow_up};
pub use prompt::{build_system_prompt, conversation_stage};

use crate::catalogue::Catalogue;
use crate::config::UniguideConfig;
use crate::extraction::extract;
use crate::llm::{LlmProvider, provider_from_config};
use crate::models::{PreferenceState, RecommendationStrategy, UniversityRecord};
use crate::ranking::{FuzzyRanker, recommend};
use crate::{Error, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

/// Default number of records summarized in the system prompt.
pub const DEFAULT_PROMPT_SAMPLE: usize = 30;

/// Result of one conversation turn.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorResponse {
    /// Reply text shown to the student.
    pub message: String,
    /// Up to five recommended universities.
    pub recommendations: Vec<UniversityRecord>,
    /// Preferences after this turn.
    pub new_state: PreferenceState,
    /// How the recommendations were chosen.
    pub strategy: RecommendationStrategy,
}

/// Answers chat messages with a reply and recommendations.
#[derive(Clone)]
pub struct AdvisorService {
    catalogue: Catalogue,
    ranker: FuzzyRanker,
    llm: Option<Arc<dyn LlmProvider>>,
    prompt_sample: usize,
}

impl std::fmt::Debug for AdvisorService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisorService")
            .field("catalogue_len", &self.catalogue.len())
            .field("ranker", &self.ranker)
            .field("llm", &self.llm.as_ref().map(|p| p.name()))
            .field("prompt_sample", &self.prompt_sample)
            .finish()
    }
}

impl AdvisorService {
    /// Creates an offline advisor with default ranking.
    #[must_use]
    pub fn new(catalogue: Catalogue) -> Self {
        Self {
            catalogue,
            ranker: FuzzyRanker::default(),
            llm: None,
            prompt_sample: DEFAULT_PROMPT_SAMPLE,
        }
    }

    /// Creates an advisor from configuration.
    ///
    /// The model is attached only when the configured provider has an API key.
    #[must_use]
    pub fn from_config(catalogue: Catalogue, config: &UniguideConfig) -> Self {
        let mut service = Self::new(catalogue)
            .with_ranker(FuzzyRanker::from_config(&config.ranking))
            .with_prompt_sample(config.llm.prompt_sample);
        service.llm = provider_from_config(&config.llm);
        service
    }

    /// Sets the ranker.
    #[must_use]
    pub fn with_ranker(mut self, ranker: FuzzyRanker) -> Self {
        self.ranker = ranker;
        self
    }

    /// Attaches a model provider.
    #[must_use]
    pub fn with_llm(mut self, llm: Arc<dyn LlmProvider>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Detaches any model provider, forcing heuristic replies.
    #[must_use]
    pub fn offline(mut self) -> Self {
        self.llm = None;
        self
    }

    /// Sets how many records the system prompt summarizes.
    #[must_use]
    pub const fn with_prompt_sample(mut self, sample: usize) -> Self {
        self.prompt_sample = sample;
        self
    }

    /// The catalogue in use.
    #[must_use]
    pub const fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Returns `true` if replies come from a model.
    #[must_use]
    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// Handles one chat message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a blank message, or the provider's
    /// error if the model call fails.
    #[instrument(skip(self, prior), fields(message_len = message.len(), llm = self.has_llm()))]
    pub fn respond(&self, message: &str, prior: &PreferenceState) -> Result<AdvisorResponse> {
        let result = self.respond_inner(message, prior);
        let status = match &result {
            Ok(_) => "success",
            Err(Error::InvalidInput(_)) => "rejected",
            Err(_) => "error",
        };
        metrics::counter!("advisor_turns_total", "status" => status).increment(1);
        result
    }

    fn respond_inner(&self, message: &str, prior: &PreferenceState) -> Result<AdvisorResponse> {
        if message.trim().is_empty() {
            return Err(Error::InvalidInput("message is required".to_string()));
        }

        let new_state = extract(message, prior);
        let records = self.catalogue.records();

        let (reply, recommendations) = if let Some(llm) = &self.llm {
            let system = build_system_prompt(prior, records, self.prompt_sample);
            let reply = llm.complete_with_system(&system, message)?;
            let reply = if reply.trim().is_empty() {
                DEFAULT_GREETING.to_string()
            } else {
                reply
            };
            let recommendations =
                recommend(&self.ranker, Some(reply.as_str()), &new_state, message, records);
            (reply, recommendations)
        } else {
            let reply = follow_up(&new_state);
            let recommendations = recommend(&self.ranker, None, &new_state, message, records);
            (reply, recommendations)
        };

        tracing::debug!(
            strategy = %recommendations.strategy(),
            results = recommendations.len(),
            "Advisor turn complete"
        );

        Ok(AdvisorResponse {
            message: reply,
            recommendations: recommendations.to_owned_records(),
            strategy: recommendations.strategy(),
            new_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Location};
    use std::sync::Mutex;

    struct ScriptedLlm {
        reply: String,
        systems: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                systems: Mutex::new(Vec::new()),
            }
        }
    }

    impl LlmProvider for ScriptedLlm {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn complete(&self, _prompt: &str) -> Result<String> {
            Ok(self.reply.clone())
        }

        fn complete_with_system(&self, system: &str, _user: &str) -> Result<String> {
            self.systems.lock().unwrap().push(system.to_string());
            Ok(self.reply.clone())
        }
    }

    struct FailingLlm;

    impl LlmProvider for FailingLlm {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn complete(&self, _prompt: &str) -> Result<String> {
            Err(Error::OperationFailed {
                operation: "complete".to_string(),
                cause: "boom".to_string(),
            })
        }
    }

    fn catalogue() -> Catalogue {
        Catalogue::from_records(vec![
            UniversityRecord::new("abdn.ac.uk", "Aberdeen").with_location("Aberdeen, Scotland"),
            UniversityRecord::new("kcl.ac.uk", "King's College London")
                .with_location("London")
                .with_description("Home to a world-leading London medicine faculty.")
                .with_nightlife(5.0),
        ])
    }

    #[test]
    fn test_blank_message_is_rejected() {
        let advisor = AdvisorService::new(catalogue());
        let err = advisor.respond("   ", &PreferenceState::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref m) if m == "message is required"));
    }

    #[test]
    fn test_offline_turn_uses_heuristic_and_fuzzy() {
        let advisor = AdvisorService::new(catalogue());
        let response = advisor
            .respond("I want to study medicine in london", &PreferenceState::new())
            .unwrap();

        assert_eq!(response.new_state.location, Some(Location::London));
        assert_eq!(response.new_state.course, Some(Course::Medicine));
        assert_eq!(response.strategy, RecommendationStrategy::FuzzyMatches);
        assert!(response.message.starts_with("I've found some Medicine courses in London."));
        assert_eq!(response.recommendations[0].name, "King's College London");
    }

    #[test]
    fn test_model_reply_naming_universities() {
        let llm = Arc::new(ScriptedLlm::new("Have you considered Aberdeen?"));
        let advisor = AdvisorService::new(catalogue()).with_llm(llm.clone());
        let prior = PreferenceState::new().with_course(Course::Law);
        let response = advisor.respond("somewhere in scotland", &prior).unwrap();

        assert_eq!(response.message, "Have you considered Aberdeen?");
        assert_eq!(response.strategy, RecommendationStrategy::NamedMatches);
        assert_eq!(response.recommendations.len(), 1);
        assert_eq!(response.recommendations[0].name, "Aberdeen");
        assert_eq!(response.new_state.location, Some(Location::Scotland));

        // The prompt reflects what was known before this message.
        let systems = llm.systems.lock().unwrap();
        assert!(systems[0].contains("Course: Law"));
        assert!(!systems[0].contains("Location: Scotland"));
    }

    #[test]
    fn test_empty_model_reply_becomes_greeting() {
        let advisor = AdvisorService::new(catalogue()).with_llm(Arc::new(ScriptedLlm::new("  ")));
        let response = advisor.respond("hello", &PreferenceState::new()).unwrap();
        assert_eq!(response.message, DEFAULT_GREETING);
        assert_eq!(response.strategy, RecommendationStrategy::FuzzyMatches);
    }

    #[test]
    fn test_provider_error_propagates() {
        let advisor = AdvisorService::new(catalogue()).with_llm(Arc::new(FailingLlm));
        let err = advisor.respond("hello", &PreferenceState::new()).unwrap_err();
        assert!(matches!(err, Error::OperationFailed { .. }));
    }

    #[test]
    fn test_offline_detaches_model() {
        let advisor = AdvisorService::new(catalogue())
            .with_llm(Arc::new(FailingLlm))
            .offline();
        assert!(!advisor.has_llm());
        assert!(advisor.respond("hello", &PreferenceState::new()).is_ok());
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let advisor = AdvisorService::new(catalogue());
        let response = advisor.respond("london", &PreferenceState::new()).unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["newState"]["location"], "London");
        assert_eq!(json["strategy"], "fuzzy_matches");
        assert!(json["recommendations"].is_array());
    }
}
