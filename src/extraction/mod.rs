//! Preference extraction from free-text chat utterances.
//!
//! # Architecture
//!
//! - [`rules`]: the ordered keyword table and grade patterns
//! - `extractor`: evaluation of the table and the monotonic merge
//!
//! # Field Priority
//!
//! | Field | Trigger | Value |
//! |-------|---------|-------|
//! | `location` | "london", "scotland", "wales", "north", "south" | `Location` |
//! | `course` | "medicine"/"medical", "engineering", "business", "computer"/"computing", "art", "law", "nursing", "psychology" | `Course` |
//! | `predictedGrades` | A-level offer (`AAB`, `A*A*A`, ...) or IB points | captured text |
//! | `vibe` | "friendly", "bustling", "creative", "historic" | `Vibe` |
//! | `sports` | "sport", "gym", "athletic" | `true` |
//! | `nightlife` | "nightlife", "party", "club" | `true` |
//!
//! Keywords are plain substrings of the lower-cased utterance, so "art" also
//! fires on "party" and "north" on "northumbria".

mod extractor;
pub mod rules;

pub use extractor::{detect_preferences, extract, extract_grades};
pub use rules::{PREFERENCE_RULES, PreferenceField, PreferenceRule, RuleValue};
