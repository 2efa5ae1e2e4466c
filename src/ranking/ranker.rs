//! Weighted fuzzy ranking of catalogue records.

use super::fuzzy::{FieldMatch, FuzzyPattern, field_norm};
use crate::config::RankingConfig;
use crate::models::{MAX_RECOMMENDATIONS, PreferenceState, RankedUniversity, UniversityRecord};
use serde::{Deserialize, Serialize};

/// Default fuzzy match threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Preset field weightings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingProfile {
    /// Name-heavy weighting that also considers the vibe descriptor.
    #[default]
    Standard,
    /// Weighting used when a model reply named nothing; ignores the vibe.
    ReplyFallback,
}

impl RankingProfile {
    /// Parses a profile name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "standard" | "default" => Some(Self::Standard),
            "reply_fallback" | "fallback" => Some(Self::ReplyFallback),
            _ => None,
        }
    }

    /// Returns the string representation used in configuration.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::ReplyFallback => "reply_fallback",
        }
    }

    /// The raw (unnormalized) weights for this profile.
    #[must_use]
    pub const fn weights(&self) -> FieldWeights {
        match self {
            Self::Standard => FieldWeights {
                name: 0.5,
                location: 0.3,
                description: 0.1,
                features: 0.1,
                vibe: 0.2,
            },
            Self::ReplyFallback => FieldWeights {
                name: 0.4,
                location: 0.3,
                description: 0.2,
                features: 0.1,
                vibe: 0.0,
            },
        }
    }
}

impl std::fmt::Display for RankingProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Relative importance of each searchable record field.
///
/// A weight of zero excludes the field from matching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeights {
    /// Display name.
    pub name: f64,
    /// Free-text location.
    pub location: f64,
    /// Description.
    pub description: f64,
    /// Each feature tag.
    pub features: f64,
    /// Vibe descriptor.
    pub vibe: f64,
}

impl FieldWeights {
    /// Scales the weights so they sum to one.
    #[must_use]
    pub fn normalized(self) -> Self {
        let total = self.name + self.location + self.description + self.features + self.vibe;
        if total <= 0.0 {
            return self;
        }
        Self {
            name: self.name / total,
            location: self.location / total,
            description: self.description / total,
            features: self.features / total,
            vibe: self.vibe / total,
        }
    }
}

/// Builds the ranking query from the accumulated preferences.
///
/// Joins whichever of location, course and vibe are set; falls back to the raw
/// utterance when none are.
#[must_use]
pub fn build_query(state: &PreferenceState, raw_utterance: &str) -> String {
    let terms = state.search_terms();
    if terms.is_empty() {
        raw_utterance.trim().to_string()
    } else {
        terms.join(" ")
    }
}

/// Returns `true` if the record satisfies the state's interest filters.
///
/// With `sports` set, the sports ranking must be better than 50th (missing
/// counts as 100). With `nightlife` set, the rating must be at least 4.
#[must_use]
pub fn passes_filters(state: &PreferenceState, record: &UniversityRecord) -> bool {
    if state.wants_sports() && record.effective_sports_ranking() >= 50 {
        return false;
    }
    if state.wants_nightlife() && !record.nightlife().is_some_and(|n| n >= 4.0) {
        return false;
    }
    true
}

/// Ranks catalogue records against preferences by weighted fuzzy matching.
#[derive(Debug, Clone)]
pub struct FuzzyRanker {
    weights: FieldWeights,
    threshold: f64,
    max_results: usize,
}

impl Default for FuzzyRanker {
    fn default() -> Self {
        Self::new(RankingProfile::Standard)
    }
}

impl FuzzyRanker {
    /// Creates a ranker with a preset profile and default limits.
    #[must_use]
    pub fn new(profile: RankingProfile) -> Self {
        Self {
            weights: profile.weights().normalized(),
            threshold: DEFAULT_THRESHOLD,
            max_results: MAX_RECOMMENDATIONS,
        }
    }

    /// Creates a ranker from configuration.
    #[must_use]
    pub fn from_config(config: &RankingConfig) -> Self {
        Self::new(config.profile)
            .with_threshold(config.threshold)
            .with_max_results(config.max_results)
    }

    /// Sets explicit field weights.
    #[must_use]
    pub fn with_weights(mut self, weights: FieldWeights) -> Self {
        self.weights = weights.normalized();
        self
    }

    /// Sets the match threshold, clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Sets the result limit, capped at [`MAX_RECOMMENDATIONS`].
    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.min(MAX_RECOMMENDATIONS);
        self
    }

    /// The effective result limit.
    #[must_use]
    pub const fn max_results(&self) -> usize {
        self.max_results
    }

    /// Recommends universities for the given preferences.
    ///
    /// Runs a fuzzy search for [`build_query`], drops records failing the
    /// sports or nightlife filters, and keeps the best `max_results`.
    /// Never fails: an empty catalogue, a blank query or no hits all yield an
    /// empty list.
    #[must_use]
    pub fn rank<'a>(
        &self,
        state: &PreferenceState,
        raw_utterance: &str,
        catalogue: &'a [UniversityRecord],
    ) -> Vec<RankedUniversity<'a>> {
        let query = build_query(state, raw_utterance);
        let candidates = self.search(&query, catalogue);
        #[allow(clippy::cast_precision_loss)]
        let candidate_count = candidates.len() as f64;
        metrics::histogram!("ranking_candidates").record(candidate_count);

        let ranked: Vec<RankedUniversity<'a>> = candidates
            .into_iter()
            .filter(|r| passes_filters(state, r.record))
            .take(self.max_results)
            .collect();

        tracing::debug!(
            query = %query,
            results = ranked.len(),
            sports = state.wants_sports(),
            nightlife = state.wants_nightlife(),
            "Ranked catalogue"
        );

        ranked
    }

    /// Fuzzy-searches the catalogue, returning every hit best first.
    ///
    /// Ties keep catalogue order.
    #[must_use]
    pub fn search<'a>(
        &self,
        query: &str,
        catalogue: &'a [UniversityRecord],
    ) -> Vec<RankedUniversity<'a>> {
        let Some(pattern) = FuzzyPattern::new(query, self.threshold) else {
            return Vec::new();
        };

        let mut hits: Vec<RankedUniversity<'a>> = catalogue
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                self.score_record(&pattern, record)
                    .map(|score| RankedUniversity {
                        record,
                        score,
                        index,
                    })
            })
            .collect();

        hits.sort_by(|a, b| a.score.total_cmp(&b.score).then(a.index.cmp(&b.index)));
        hits
    }

    /// Combined score for one record, or `None` if no field matched.
    ///
    /// Each matching value contributes `score^(weight * norm)`; the product
    /// shrinks as more fields match.
    fn score_record(&self, pattern: &FuzzyPattern, record: &UniversityRecord) -> Option<f64> {
        let mut total = 1.0_f64;
        let mut matched = false;

        let mut consider = |value: &str, weight: f64| {
            if weight <= 0.0 || value.is_empty() {
                return;
            }
            let FieldMatch { score, is_match } = pattern.search_in(value);
            if !is_match {
                return;
            }
            matched = true;
            let base = if score == 0.0 { f64::EPSILON } else { score };
            total *= base.powf(weight * field_norm(value));
        };

        consider(&record.name, self.weights.name);
        consider(&record.location, self.weights.location);
        consider(&record.description, self.weights.description);
        for feature in &record.features {
            consider(feature, self.weights.features);
        }
        if let Some(vibe) = record.vibe() {
            consider(vibe, self.weights.vibe);
        }

        matched.then_some(total)
    }
}
