//! Accumulated conversation preferences.
//!
//! A [`PreferenceState`] is owned by a single conversation and only ever grows:
//! once a field is set it stays set, and a later turn can only overwrite it with
//! another value for the same field. See [`PreferenceState::merge`].

use serde::{Deserialize, Serialize};

/// Preferred study region within the UK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// Greater London.
    London,
    /// Scotland.
    Scotland,
    /// Wales.
    Wales,
    /// The north of England.
    #[serde(alias = "North England")]
    North,
    /// The south of England.
    #[serde(alias = "South England")]
    South,
}

impl Location {
    /// Returns the display name used in queries and serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::London => "London",
            Self::Scotland => "Scotland",
            Self::Wales => "Wales",
            Self::North => "North",
            Self::South => "South",
        }
    }

    /// Parses a location name, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "london" => Some(Self::London),
            "scotland" => Some(Self::Scotland),
            "wales" => Some(Self::Wales),
            "north" | "north england" | "northern england" => Some(Self::North),
            "south" | "south england" | "southern england" => Some(Self::South),
            _ => None,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Subject area the user wants to study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Course {
    /// Medicine and medical degrees.
    Medicine,
    /// Engineering.
    Engineering,
    /// Business and management.
    Business,
    /// Computer science and computing.
    #[serde(rename = "Computer Science")]
    ComputerScience,
    /// Arts.
    #[serde(alias = "Art")]
    Arts,
    /// Law.
    Law,
    /// Nursing.
    Nursing,
    /// Psychology.
    Psychology,
}

impl Course {
    /// Returns the display name used in queries and serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Medicine => "Medicine",
            Self::Engineering => "Engineering",
            Self::Business => "Business",
            Self::ComputerScience => "Computer Science",
            Self::Arts => "Arts",
            Self::Law => "Law",
            Self::Nursing => "Nursing",
            Self::Psychology => "Psychology",
        }
    }

    /// Parses a course name, case-insensitively, with common aliases.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "medicine" | "medical" => Some(Self::Medicine),
            "engineering" => Some(Self::Engineering),
            "business" => Some(Self::Business),
            "computer science" | "computer-science" | "computing" | "cs" => {
                Some(Self::ComputerScience)
            },
            "arts" | "art" => Some(Self::Arts),
            "law" => Some(Self::Law),
            "nursing" => Some(Self::Nursing),
            "psychology" => Some(Self::Psychology),
            _ => None,
        }
    }
}

impl std::fmt::Display for Course {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Campus atmosphere the user is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vibe {
    /// Friendly, welcoming community.
    Friendly,
    /// Busy city life.
    Bustling,
    /// Creative and artistic.
    Creative,
    /// Old, historic institutions.
    Historic,
}

impl Vibe {
    /// Returns the display name used in queries and serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Friendly => "Friendly",
            Self::Bustling => "Bustling",
            Self::Creative => "Creative",
            Self::Historic => "Historic",
        }
    }

    /// Parses a vibe name, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "friendly" => Some(Self::Friendly),
            "bustling" => Some(Self::Bustling),
            "creative" => Some(Self::Creative),
            "historic" => Some(Self::Historic),
            _ => None,
        }
    }
}

impl std::fmt::Display for Vibe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a conversation has learned about the user so far.
///
/// Every field is optional; absence means "no constraint". Serialized with
/// camelCase keys, omitting unset fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceState {
    /// Preferred region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Intended subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<Course>,
    /// Preferred campus atmosphere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibe: Option<Vibe>,
    /// Predicted or achieved grades, e.g. `AAB` or `IB 38 points`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_grades: Option<String>,
    /// Interested in sports facilities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sports: Option<bool>,
    /// Interested in nightlife.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nightlife: Option<bool>,
}

impl PreferenceState {
    /// Creates an empty state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            location: None,
            course: None,
            vibe: None,
            predicted_grades: None,
            sports: None,
            nightlife: None,
        }
    }

    /// Sets the location.
    #[must_use]
    pub const fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Sets the course.
    #[must_use]
    pub const fn with_course(mut self, course: Course) -> Self {
        self.course = Some(course);
        self
    }

    /// Sets the vibe.
    #[must_use]
    pub const fn with_vibe(mut self, vibe: Vibe) -> Self {
        self.vibe = Some(vibe);
        self
    }

    /// Sets the predicted grades.
    #[must_use]
    pub fn with_grades(mut self, grades: impl Into<String>) -> Self {
        self.predicted_grades = Some(grades.into());
        self
    }

    /// Sets the sports flag.
    #[must_use]
    pub const fn with_sports(mut self, sports: bool) -> Self {
        self.sports = Some(sports);
        self
    }

    /// Sets the nightlife flag.
    #[must_use]
    pub const fn with_nightlife(mut self, nightlife: bool) -> Self {
        self.nightlife = Some(nightlife);
        self
    }

    /// Monotonic per-field merge: values set in `update` win, everything else
    /// is carried over from `self`.
    ///
    /// No field set in `self` is ever cleared by a merge.
    #[must_use]
    pub fn merge(self, update: Self) -> Self {
        Self {
            location: update.location.or(self.location),
            course: update.course.or(self.course),
            vibe: update.vibe.or(self.vibe),
            predicted_grades: update.predicted_grades.or(self.predicted_grades),
            sports: update.sports.or(self.sports),
            nightlife: update.nightlife.or(self.nightlife),
        }
    }

    /// Returns `true` when nothing has been learned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::new()
    }

    /// Whether the user asked for good sports facilities.
    #[must_use]
    pub fn wants_sports(&self) -> bool {
        self.sports == Some(true)
    }

    /// Whether the user asked for good nightlife.
    #[must_use]
    pub fn wants_nightlife(&self) -> bool {
        self.nightlife == Some(true)
    }

    /// Terms used to build a ranking query, in location, course, vibe order.
    #[must_use]
    pub fn search_terms(&self) -> Vec<&'static str> {
        [
            self.location.map(|l| l.as_str()),
            self.course.map(|c| c.as_str()),
            self.vibe.map(|v| v.as_str()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Human-readable summary lines, one per known preference.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(location) = self.location {
            lines.push(format!("Location: {location}"));
        }
        if let Some(course) = self.course {
            lines.push(format!("Course: {course}"));
        }
        if let Some(grades) = self.predicted_grades.as_deref().filter(|g| !g.is_empty()) {
            lines.push(format!("Predicted Grades: {grades}"));
        }
        if let Some(vibe) = self.vibe {
            lines.push(format!("Vibe: {vibe}"));
        }
        if self.wants_sports() {
            lines.push("Interested in sports facilities".to_string());
        }
        if self.wants_nightlife() {
            lines.push("Interested in nightlife".to_string());
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unset_fields() {
        let old = PreferenceState::new()
            .with_location(Location::London)
            .with_grades("AAB");
        let update = PreferenceState::new().with_course(Course::Law);

        let merged = old.merge(update);
        assert_eq!(merged.location, Some(Location::London));
        assert_eq!(merged.course, Some(Course::Law));
        assert_eq!(merged.predicted_grades.as_deref(), Some("AAB"));
    }

    #[test]
    fn test_merge_overwrites_same_field() {
        let old = PreferenceState::new().with_location(Location::Wales);
        let merged = old.merge(PreferenceState::new().with_location(Location::Scotland));
        assert_eq!(merged.location, Some(Location::Scotland));
    }

    #[test]
    fn test_merge_never_clears_flags() {
        let old = PreferenceState::new().with_sports(true);
        let merged = old.merge(PreferenceState::new());
        assert!(merged.wants_sports());
    }

    #[test]
    fn test_search_terms_order() {
        let state = PreferenceState::new()
            .with_vibe(Vibe::Historic)
            .with_course(Course::Medicine)
            .with_location(Location::London);
        assert_eq!(state.search_terms(), vec!["London", "Medicine", "Historic"]);
    }

    #[test]
    fn test_serde_camel_case_and_aliases() {
        let json = r#"{"location":"North England","course":"Art","predictedGrades":"ABB","sports":true}"#;
        let state: PreferenceState = serde_json::from_str(json).unwrap();
        assert_eq!(state.location, Some(Location::North));
        assert_eq!(state.course, Some(Course::Arts));
        assert_eq!(state.predicted_grades.as_deref(), Some("ABB"));
        assert!(state.wants_sports());
        assert!(!state.wants_nightlife());

        let out = serde_json::to_string(&state).unwrap();
        assert!(out.contains(r#""location":"North""#));
        assert!(out.contains(r#""predictedGrades":"ABB""#));
        assert!(!out.contains("nightlife"));
    }

    #[test]
    fn test_computer_science_serializes_with_space() {
        let state = PreferenceState::new().with_course(Course::ComputerScience);
        let out = serde_json::to_string(&state).unwrap();
        assert_eq!(out, r#"{"course":"Computer Science"}"#);
    }

    #[test]
    fn test_summary_lines() {
        let state = PreferenceState::new()
            .with_location(Location::Scotland)
            .with_nightlife(true);
        assert_eq!(
            state.summary_lines(),
            vec!["Location: Scotland", "Interested in nightlife"]
        );
        assert!(PreferenceState::new().summary_lines().is_empty());
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(Location::parse("North England"), Some(Location::North));
        assert_eq!(Course::parse("computing"), Some(Course::ComputerScience));
        assert_eq!(Vibe::parse("HISTORIC"), Some(Vibe::Historic));
        assert_eq!(Vibe::parse("sleepy"), None);
    }
}
