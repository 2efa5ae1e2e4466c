//! # Uniguide
//!
//! A conversational advisor for choosing a UK university.
//!
//! Uniguide turns free-text chat messages into an accumulated
//! [`PreferenceState`] and recommends up to five universities from a static
//! catalogue, either by fuzzy ranking or by picking up universities a language
//! model named in its reply.
//!
//! ## Features
//!
//! - Ordered keyword rules for location, course, vibe, grades and interests
//! - Weighted approximate-substring ranking with sports and nightlife filters
//! - Exact name-mention shortcut for model replies
//! - Optional OpenAI-compatible model with an offline heuristic fallback
//! - Catalogue cleaning for scraped data
//!
//! ## Example
//!
//! ```rust,ignore
//! use uniguide::{FuzzyRanker, PreferenceState, extract};
//!
//! let state = extract("I want to study medicine in london", &PreferenceState::new());
//! let results = FuzzyRanker::default().rank(&state, "", catalogue.records());
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod advisor;
pub mod catalogue;
pub mod cli;
pub mod config;
pub mod extraction;
pub mod llm;
pub mod models;
pub mod observability;
pub mod ranking;

pub use advisor::{AdvisorResponse, AdvisorService};
pub use catalogue::Catalogue;
pub use config::UniguideConfig;
pub use extraction::extract;
pub use llm::LlmProvider;
pub use models::{
    Course, Location, MAX_RECOMMENDATIONS, PreferenceState, RecommendationStrategy,
    Recommendations, UniversityRecord, Vibe,
};
pub use ranking::{FuzzyRanker, RankingProfile, mentioned_universities, recommend};

/// Error type for uniguide operations.
///
/// Extraction and ranking never fail; errors come from the surrounding I/O.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Blank chat message, malformed catalogue or state JSON, bad config values |
/// | `OperationFailed` | File I/O, HTTP failures, non-success model status, logging init |
/// | `NotFound` | Unknown university slug |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A chat message is blank
    /// - Catalogue, state or config files are malformed
    /// - Ranking settings are out of range
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - Filesystem I/O errors occur
    /// - The model endpoint is unreachable or returns an error status
    /// - Logging is initialized twice
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// A requested item does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Result type alias for uniguide operations.
pub type Result<T> = std::result::Result<T, Error>;
