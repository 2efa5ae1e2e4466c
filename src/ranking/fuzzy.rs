//! Approximate substring matching.
//!
//! A pattern matches a text when some substring of the text can be turned into
//! the pattern with few enough single-byte edits. The score is
//! `errors / pattern_length`, so `0.0` is a perfect hit and `1.0` is no hit at
//! all. The position of the hit inside the text does not matter.
//!
//! The edit search itself is `triple_accel`'s Levenshtein substring search;
//! this module adds chunking, normalization and the threshold.
//!
//! Long patterns are split into chunks of [`MAX_CHUNK_LEN`] characters which are
//! scored independently and averaged. A field matches if any chunk does.

use triple_accel::levenshtein::levenshtein_search;

/// Longest pattern chunk scored in one pass.
pub const MAX_CHUNK_LEN: usize = 32;

/// Floor applied to the score of any non-identical match.
pub const MIN_MATCH_SCORE: f64 = 0.001;

/// Result of matching a pattern against one field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMatch {
    /// Normalized error score in `[0.0, 1.0]`. Lower is better.
    pub score: f64,
    /// Whether the score is within the threshold.
    pub is_match: bool,
}

impl FieldMatch {
    const MISS: Self = Self {
        score: 1.0,
        is_match: false,
    };
}

/// A lower-cased query prepared for repeated matching.
#[derive(Debug, Clone)]
pub struct FuzzyPattern {
    pattern: String,
    chunks: Vec<String>,
    threshold: f64,
}

impl FuzzyPattern {
    /// Prepares a pattern. Returns `None` for a blank query.
    ///
    /// `threshold` is the highest normalized error score accepted as a match.
    #[must_use]
    pub fn new(query: &str, threshold: f64) -> Option<Self> {
        let pattern = query.trim().to_lowercase();
        if pattern.is_empty() {
            return None;
        }

        let chars: Vec<char> = pattern.chars().collect();
        Some(Self {
            chunks: split_chunks(&chars),
            pattern,
            threshold,
        })
    }

    /// The normalized pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Scores this pattern against a text.
    #[must_use]
    pub fn search_in(&self, text: &str) -> FieldMatch {
        let text = text.to_lowercase();
        if text == self.pattern {
            return FieldMatch {
                score: 0.0,
                is_match: true,
            };
        }

        let mut total = 0.0;
        let mut any_match = false;

        for chunk in &self.chunks {
            let chunk_match = self.search_chunk(chunk, &text);
            any_match |= chunk_match.is_match;
            total += chunk_match.score;
        }

        if !any_match {
            return FieldMatch::MISS;
        }

        #[allow(clippy::cast_precision_loss)]
        let score = total / self.chunks.len() as f64;
        FieldMatch {
            score,
            is_match: true,
        }
    }

    fn search_chunk(&self, chunk: &str, text: &str) -> FieldMatch {
        let errors = min_substring_edits(chunk, text);
        #[allow(clippy::cast_precision_loss)]
        let score = errors as f64 / chunk.len() as f64;
        if score <= self.threshold {
            FieldMatch {
                score: score.max(MIN_MATCH_SCORE),
                is_match: true,
            }
        } else {
            FieldMatch::MISS
        }
    }
}

/// Splits a pattern into chunks of at most [`MAX_CHUNK_LEN`] characters.
///
/// A trailing remainder is taken as the last full-length window of the
/// pattern, so it may overlap the previous chunk.
fn split_chunks(chars: &[char]) -> Vec<String> {
    if chars.len() <= MAX_CHUNK_LEN {
        return vec![chars.iter().collect()];
    }

    let remainder = chars.len() % MAX_CHUNK_LEN;
    let end = chars.len() - remainder;
    let mut chunks: Vec<String> = chars[..end]
        .chunks(MAX_CHUNK_LEN)
        .map(|chunk| chunk.iter().collect())
        .collect();
    if remainder > 0 {
        chunks.push(chars[chars.len() - MAX_CHUNK_LEN..].iter().collect());
    }
    chunks
}

/// Minimum edit distance between `pattern` and any substring of `text`,
/// counted in bytes.
///
/// Skipping text before and after the hit is free. Deleting the whole pattern
/// is always possible, so the result never exceeds `pattern.len()`.
#[must_use]
pub fn min_substring_edits(pattern: &str, text: &str) -> usize {
    if pattern.is_empty() || text.is_empty() {
        return pattern.len();
    }

    levenshtein_search(pattern.as_bytes(), text.as_bytes())
        .filter_map(|m| usize::try_from(m.k).ok())
        .min()
        .map_or(pattern.len(), |k| k.min(pattern.len()))
}

/// Length normalization for a field value: `1 / sqrt(word count)`, rounded to
/// three decimals. Longer values contribute less to a record's score.
#[must_use]
pub fn field_norm(text: &str) -> f64 {
    let words = text.split(' ').filter(|w| !w.is_empty()).count().max(1);
    #[allow(clippy::cast_precision_loss)]
    let norm = 1.0 / (words as f64).sqrt();
    (norm * 1000.0).round() / 1000.0
}
