//! Keyword table tests for preference extraction.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use test_case::test_case;
use uniguide::extraction::{detect_preferences, extract_grades};
use uniguide::models::{Course, Location, PreferenceState, Vibe};
use uniguide::extract;

#[test_case("I'd love to be in London" => Some(Location::London) ; "london")]
#[test_case("somewhere in SCOTLAND" => Some(Location::Scotland) ; "scotland uppercase")]
#[test_case("maybe wales" => Some(Location::Wales) ; "wales")]
#[test_case("up north somewhere" => Some(Location::North) ; "north")]
#[test_case("the south coast" => Some(Location::South) ; "south")]
#[test_case("north london" => Some(Location::London) ; "london outranks north")]
#[test_case("no idea yet" => None ; "no location")]
fn location_keywords(utterance: &str) -> Option<Location> {
    detect_preferences(utterance).location
}

#[test_case("medicine" => Some(Course::Medicine) ; "medicine")]
#[test_case("a medical degree" => Some(Course::Medicine) ; "medical")]
#[test_case("mechanical engineering" => Some(Course::Engineering) ; "engineering")]
#[test_case("business management" => Some(Course::Business) ; "business")]
#[test_case("computing" => Some(Course::ComputerScience) ; "computing")]
#[test_case("computer science" => Some(Course::ComputerScience) ; "computer")]
#[test_case("fine art" => Some(Course::Arts) ; "art")]
#[test_case("law" => Some(Course::Law) ; "law")]
#[test_case("nursing" => Some(Course::Nursing) ; "nursing")]
#[test_case("psychology" => Some(Course::Psychology) ; "psychology")]
#[test_case("medical law" => Some(Course::Medicine) ; "first rule wins")]
fn course_keywords(utterance: &str) -> Option<Course> {
    detect_preferences(utterance).course
}

#[test_case("a friendly campus" => Some(Vibe::Friendly) ; "friendly")]
#[test_case("somewhere bustling" => Some(Vibe::Bustling) ; "bustling")]
#[test_case("a creative place" => Some(Vibe::Creative) ; "creative")]
#[test_case("historic buildings" => Some(Vibe::Historic) ; "historic")]
fn vibe_keywords(utterance: &str) -> Option<Vibe> {
    detect_preferences(utterance).vibe
}

#[test_case("I play a lot of sport" => (Some(true), None) ; "sport")]
#[test_case("a decent gym" => (Some(true), None) ; "gym")]
#[test_case("athletic clubs" => (Some(true), Some(true)) ; "athletic and club")]
#[test_case("great nightlife" => (None, Some(true)) ; "nightlife")]
#[test_case("quiet town" => (None, None) ; "neither")]
fn interest_keywords(utterance: &str) -> (Option<bool>, Option<bool>) {
    let state = detect_preferences(utterance);
    (state.sports, state.nightlife)
}

#[test_case("I'm predicted AAB" => Some("AAB".to_string()) ; "a level")]
#[test_case("predicted a*a*a" => Some("A*A*A".to_string()) ; "a star uppercased")]
#[test_case("IB 38 points" => Some("IB 38 points".to_string()) ; "ib points")]
#[test_case("about 40 points" => Some("40 points".to_string()) ; "points only")]
#[test_case("I'm doing the IB" => Some("IB".to_string()) ; "ib mention")]
#[test_case("no grades yet" => None ; "no grades")]
fn grade_patterns(utterance: &str) -> Option<String> {
    extract_grades(utterance)
}

#[test]
fn test_later_value_overwrites_same_field() {
    let first = extract("medicine in london", &PreferenceState::new());
    let second = extract("actually scotland", &first);
    assert_eq!(second.location, Some(Location::Scotland));
    assert_eq!(second.course, Some(Course::Medicine));
}

#[test]
fn test_blank_utterance_detects_nothing() {
    assert!(detect_preferences("   ").is_empty());
}
