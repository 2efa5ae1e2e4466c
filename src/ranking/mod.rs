//! Recommendation ranking.
//!
//! Two strategies turn a conversation turn into at most
//! [`MAX_RECOMMENDATIONS`](crate::models::MAX_RECOMMENDATIONS) universities:
//!
//! | Strategy | Selected when | Order |
//! |----------|---------------|-------|
//! | `NamedMatches` | the reply names at least one catalogue university | catalogue order |
//! | `FuzzyMatches` | otherwise, or when there is no reply | relevance, best first |
//!
//! # Fuzzy Ranking
//!
//! ```text
//! PreferenceState ──► query ("London Medicine", or the raw utterance)
//!                       │
//!                       └─► weighted approximate match (threshold 0.4)
//!                              │
//!                              └─► sports / nightlife filters
//!                                     │
//!                                     └─► first N hits
//! ```
//!
//! | Field | Standard | Reply fallback |
//! |-------|----------|----------------|
//! | name | 0.5 | 0.4 |
//! | location | 0.3 | 0.3 |
//! | description | 0.1 | 0.2 |
//! | features | 0.1 | 0.1 |
//! | vibe | 0.2 | - |

pub mod fuzzy;
mod mention;
mod ranker;

pub use mention::mentioned_universities;
pub use ranker::{
    DEFAULT_THRESHOLD, FieldWeights, FuzzyRanker, RankingProfile, build_query, passes_filters,
};

use crate::models::{PreferenceState, Recommendations, UniversityRecord};

/// Picks the recommendation strategy for a turn and runs it.
///
/// If `reply` mentions any catalogue university by name, those records are
/// returned directly. Otherwise the fuzzy ranker runs over `state`, falling
/// back to `utterance` as the query when the state is empty.
#[must_use]
pub fn recommend<'a>(
    ranker: &FuzzyRanker,
    reply: Option<&str>,
    state: &PreferenceState,
    utterance: &str,
    catalogue: &'a [UniversityRecord],
) -> Recommendations<'a> {
    let named = reply
        .map(|text| mentioned_universities(text, catalogue, ranker.max_results()))
        .unwrap_or_default();

    let recommendations = if named.is_empty() {
        Recommendations::FuzzyMatches(ranker.rank(state, utterance, catalogue))
    } else {
        Recommendations::NamedMatches(named)
    };

    metrics::counter!(
        "recommendations_total",
        "strategy" => recommendations.strategy().as_str()
    )
    .increment(1);

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, MAX_RECOMMENDATIONS, RecommendationStrategy};

    fn catalogue() -> Vec<UniversityRecord> {
        vec![
            UniversityRecord::new("abdn.ac.uk", "Aberdeen").with_location("Aberdeen, Scotland"),
            UniversityRecord::new("kcl.ac.uk", "King's College London").with_location("London"),
        ]
    }

    #[test]
    fn test_named_mention_bypasses_fuzzy_ranking() {
        let records = catalogue();
        let state = PreferenceState::new().with_location(Location::London);
        let recs = recommend(
            &FuzzyRanker::default(),
            Some("You might love Aberdeen."),
            &state,
            "",
            &records,
        );
        assert_eq!(recs.strategy(), RecommendationStrategy::NamedMatches);
        assert_eq!(recs.records()[0].name, "Aberdeen");
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn test_named_mentions_are_capped() {
        let records: Vec<UniversityRecord> = (0..8)
            .map(|i| UniversityRecord::new(format!("u{i}.ac.uk"), format!("Uni {i}")))
            .collect();
        let reply = "Consider Uni 0, Uni 1, Uni 2, Uni 3, Uni 4, Uni 5, Uni 6 or Uni 7.";
        let recs = recommend(
            &FuzzyRanker::default(),
            Some(reply),
            &PreferenceState::new(),
            "",
            &records,
        );
        assert_eq!(recs.strategy(), RecommendationStrategy::NamedMatches);
        assert_eq!(recs.len(), MAX_RECOMMENDATIONS);
        let names: Vec<&str> = recs.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Uni 0", "Uni 1", "Uni 2", "Uni 3", "Uni 4"]);
    }

    #[test]
    fn test_no_mention_falls_back_to_fuzzy() {
        let records = catalogue();
        let state = PreferenceState::new().with_location(Location::London);
        let recs = recommend(
            &FuzzyRanker::default(),
            Some("Tell me more about what you like."),
            &state,
            "",
            &records,
        );
        assert_eq!(recs.strategy(), RecommendationStrategy::FuzzyMatches);
        assert_eq!(recs.records()[0].name, "King's College London");
    }

    #[test]
    fn test_no_reply_uses_fuzzy() {
        let records = catalogue();
        let recs = recommend(
            &FuzzyRanker::default(),
            None,
            &PreferenceState::new(),
            "aberdeen",
            &records,
        );
        assert_eq!(recs.strategy(), RecommendationStrategy::FuzzyMatches);
        assert_eq!(recs.records()[0].name, "Aberdeen");
    }
}
