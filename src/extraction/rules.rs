//! Preference detection rules.
//!
//! Static rule data for keyword-based preference extraction. Rules are listed in
//! field priority order (location, course, vibe, interests) and, within a field,
//! in match priority order: the first rule whose keyword appears wins.
// Allow expect() on static regex patterns - these are guaranteed to compile
#![allow(clippy::expect_used)]

use regex::Regex;
use std::sync::LazyLock;

use crate::models::{Course, Location, PreferenceState, Vibe};

/// The state field a rule writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceField {
    /// `location`
    Location,
    /// `course`
    Course,
    /// `predictedGrades`
    Grades,
    /// `vibe`
    Vibe,
    /// `sports`
    Sports,
    /// `nightlife`
    Nightlife,
}

impl PreferenceField {
    /// Fields in the order they are evaluated.
    pub const PRIORITY: [Self; 6] = [
        Self::Location,
        Self::Course,
        Self::Grades,
        Self::Vibe,
        Self::Sports,
        Self::Nightlife,
    ];
}

/// The value a rule assigns when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleValue {
    /// Sets `location`.
    Location(Location),
    /// Sets `course`.
    Course(Course),
    /// Sets `vibe`.
    Vibe(Vibe),
    /// Latches `sports` to `true`.
    Sports,
    /// Latches `nightlife` to `true`.
    Nightlife,
}

impl RuleValue {
    /// The field this value belongs to.
    #[must_use]
    pub const fn field(&self) -> PreferenceField {
        match self {
            Self::Location(_) => PreferenceField::Location,
            Self::Course(_) => PreferenceField::Course,
            Self::Vibe(_) => PreferenceField::Vibe,
            Self::Sports => PreferenceField::Sports,
            Self::Nightlife => PreferenceField::Nightlife,
        }
    }

    /// Writes this value into a state.
    pub fn apply(self, state: &mut PreferenceState) {
        match self {
            Self::Location(location) => state.location = Some(location),
            Self::Course(course) => state.course = Some(course),
            Self::Vibe(vibe) => state.vibe = Some(vibe),
            Self::Sports => state.sports = Some(true),
            Self::Nightlife => state.nightlife = Some(true),
        }
    }
}

/// A keyword rule: if any keyword is a substring of the lower-cased utterance,
/// the value is assigned.
#[derive(Debug)]
pub struct PreferenceRule {
    /// Lower-case substrings that trigger the rule.
    pub keywords: &'static [&'static str],
    /// The value assigned when triggered.
    pub value: RuleValue,
}

impl PreferenceRule {
    /// Returns `true` if the (already lower-cased) text triggers this rule.
    #[must_use]
    pub fn matches(&self, text_lower: &str) -> bool {
        self.keywords.iter().any(|k| text_lower.contains(k))
    }
}

/// All keyword rules, in evaluation order.
pub static PREFERENCE_RULES: &[PreferenceRule] = &[
    // Location
    PreferenceRule {
        keywords: &["london"],
        value: RuleValue::Location(Location::London),
    },
    PreferenceRule {
        keywords: &["scotland"],
        value: RuleValue::Location(Location::Scotland),
    },
    PreferenceRule {
        keywords: &["wales"],
        value: RuleValue::Location(Location::Wales),
    },
    PreferenceRule {
        keywords: &["north"],
        value: RuleValue::Location(Location::North),
    },
    PreferenceRule {
        keywords: &["south"],
        value: RuleValue::Location(Location::South),
    },
    // Course
    PreferenceRule {
        keywords: &["medicine", "medical"],
        value: RuleValue::Course(Course::Medicine),
    },
    PreferenceRule {
        keywords: &["engineering"],
        value: RuleValue::Course(Course::Engineering),
    },
    PreferenceRule {
        keywords: &["business"],
        value: RuleValue::Course(Course::Business),
    },
    PreferenceRule {
        keywords: &["computer", "computing"],
        value: RuleValue::Course(Course::ComputerScience),
    },
    PreferenceRule {
        keywords: &["art"],
        value: RuleValue::Course(Course::Arts),
    },
    PreferenceRule {
        keywords: &["law"],
        value: RuleValue::Course(Course::Law),
    },
    PreferenceRule {
        keywords: &["nursing"],
        value: RuleValue::Course(Course::Nursing),
    },
    PreferenceRule {
        keywords: &["psychology"],
        value: RuleValue::Course(Course::Psychology),
    },
    // Vibe
    PreferenceRule {
        keywords: &["friendly"],
        value: RuleValue::Vibe(Vibe::Friendly),
    },
    PreferenceRule {
        keywords: &["bustling"],
        value: RuleValue::Vibe(Vibe::Bustling),
    },
    PreferenceRule {
        keywords: &["creative"],
        value: RuleValue::Vibe(Vibe::Creative),
    },
    PreferenceRule {
        keywords: &["historic"],
        value: RuleValue::Vibe(Vibe::Historic),
    },
    // Interests
    PreferenceRule {
        keywords: &["sport", "gym", "athletic"],
        value: RuleValue::Sports,
    },
    PreferenceRule {
        keywords: &["nightlife", "party", "club"],
        value: RuleValue::Nightlife,
    },
];

/// Common A-level offers. Their presence is what triggers grade capture.
pub static A_LEVEL_TRIGGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)a\*a\*a|aaa|aab|abb|bbb|abc|bbc|ccc").expect("static regex: a-level trigger")
});

/// The captured grade string: the first run of three or more grade characters.
///
/// Deliberately loose; any word containing such a run (e.g. "accommodation")
/// is also captured once the trigger has fired.
pub static A_LEVEL_GRADES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[a-c*]{3,}").expect("static regex: a-level grades"));

/// An IB point total such as `38 points` or `IB 40 points`.
pub static IB_POINTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(ib\s*)?\d{2}\s*points?").expect("static regex: ib points")
});

/// A standalone mention of the International Baccalaureate.
pub static IB_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bib\b").expect("static regex: ib mention"));
