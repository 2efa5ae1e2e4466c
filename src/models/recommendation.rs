//! Recommendation result types.

use super::UniversityRecord;
use serde::{Deserialize, Serialize};

/// Hard upper bound on how many universities are ever recommended at once.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Which path produced a set of recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStrategy {
    /// The reply named catalogue universities verbatim.
    NamedMatches,
    /// Fuzzy ranking over the accumulated preferences.
    FuzzyMatches,
}

impl RecommendationStrategy {
    /// Returns the string representation used in serialization and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NamedMatches => "named_matches",
            Self::FuzzyMatches => "fuzzy_matches",
        }
    }
}

impl std::fmt::Display for RecommendationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A catalogue record with its fuzzy relevance score.
///
/// Scores follow the "lower is better" convention, `0.0` being a perfect match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedUniversity<'a> {
    /// The matched record.
    pub record: &'a UniversityRecord,
    /// Combined relevance score in `[0.0, 1.0]`.
    pub score: f64,
    /// Position in the catalogue, used as a stable tie-breaker.
    pub index: usize,
}

/// Recommendations tagged with the strategy that produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendations<'a> {
    /// Universities named in the reply, in catalogue order.
    NamedMatches(Vec<&'a UniversityRecord>),
    /// Universities found by fuzzy ranking, best first.
    FuzzyMatches(Vec<RankedUniversity<'a>>),
}

impl<'a> Recommendations<'a> {
    /// The strategy that produced these recommendations.
    #[must_use]
    pub const fn strategy(&self) -> RecommendationStrategy {
        match self {
            Self::NamedMatches(_) => RecommendationStrategy::NamedMatches,
            Self::FuzzyMatches(_) => RecommendationStrategy::FuzzyMatches,
        }
    }

    /// The recommended records in presentation order.
    #[must_use]
    pub fn records(&self) -> Vec<&'a UniversityRecord> {
        match self {
            Self::NamedMatches(records) => records.clone(),
            Self::FuzzyMatches(ranked) => ranked.iter().map(|r| r.record).collect(),
        }
    }

    /// Number of recommendations.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::NamedMatches(records) => records.len(),
            Self::FuzzyMatches(ranked) => ranked.len(),
        }
    }

    /// Returns `true` if nothing was recommended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clones the recommended records out of the catalogue.
    #[must_use]
    pub fn to_owned_records(&self) -> Vec<UniversityRecord> {
        self.records().into_iter().cloned().collect()
    }
}
