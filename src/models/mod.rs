//! Data models for uniguide.
//!
//! This module contains the core data structures shared by extraction,
//! ranking and the advisor.

mod preference;
mod recommendation;
mod university;

pub use preference::{Course, Location, PreferenceState, Vibe};
pub use recommendation::{
    MAX_RECOMMENDATIONS, RankedUniversity, RecommendationStrategy, Recommendations,
};
pub use university::{
    CampusStats, CostOfLiving, HeadlineStats, LocationStats, Rankings, TravelInfo,
    UniversityRecord,
};
