//! Repair pass for scraped catalogue data.
//!
//! Scraped records arrive with duplicate ids, raw crawler transcripts in place
//! of descriptions, and navigation debris in the long-form text fields.
//! [`clean`] fixes all three and reports what it changed.
// Allow expect() on static regex patterns - these are guaranteed to compile
#![allow(clippy::expect_used)]

use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::UniversityRecord;

/// Extracted descriptions shorter than this are replaced.
const MIN_DESCRIPTION_CHARS: usize = 50;

/// Crawler transcript header.
const SITE_HEADER: &str = "# Site:";

/// Marker for a transcript that captured nothing.
const NO_SENTENCES: &str = "(No sentences captured.)";

/// Text following the crawler's `New sentences found on <url>:` marker.
static CRAWLED_SENTENCES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)New sentences found on \S+?:(?:\s+|$)(.*)")
        .expect("static regex: crawled sentences")
});

/// Page chrome that precedes the real text.
static BOILERPLATE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(Close Or Browse:|Browser does not support script\.|You are using an outdated browser\.)\s*",
    )
    .expect("static regex: boilerplate prefix")
});

/// What a cleaning pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningReport {
    /// Records dropped because their id was already present.
    pub duplicates_removed: usize,
    /// Descriptions replaced or repaired.
    pub descriptions_rewritten: usize,
    /// Long-form text fields cleared.
    pub fields_cleared: usize,
}

impl std::fmt::Display for CleaningReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "removed {} duplicate(s), rewrote {} description(s), cleared {} field(s)",
            self.duplicates_removed, self.descriptions_rewritten, self.fields_cleared
        )
    }
}

/// Cleans scraped records.
///
/// Duplicates by id collapse into the richer entry, kept at the position of
/// the first occurrence. Crawler transcripts become readable descriptions, and
/// long-form fields holding page debris are cleared.
#[must_use]
pub fn clean(records: Vec<UniversityRecord>) -> (Vec<UniversityRecord>, CleaningReport) {
    let mut report = CleaningReport::default();
    let mut unique = deduplicate(records, &mut report);

    for record in &mut unique {
        if repair_description(record) {
            report.descriptions_rewritten += 1;
        }
        report.fields_cleared += clear_debris_fields(record);
    }

    tracing::debug!(
        records = unique.len(),
        duplicates_removed = report.duplicates_removed,
        descriptions_rewritten = report.descriptions_rewritten,
        fields_cleared = report.fields_cleared,
        "Cleaned catalogue"
    );

    (unique, report)
}

/// Placeholder description for records whose text could not be recovered.
#[must_use]
pub fn generic_description(name: &str, location: &str) -> String {
    let location = if location.trim().is_empty() {
        "the UK"
    } else {
        location
    };
    format!(
        "{name} is a higher education institution located in {location}. \
         It offers a variety of undergraduate and postgraduate programs."
    )
}

fn richness(record: &UniversityRecord) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let score = record.populated_field_count() as f64
        + record.description.chars().count() as f64 / 100.0;
    score
}

fn deduplicate(
    records: Vec<UniversityRecord>,
    report: &mut CleaningReport,
) -> Vec<UniversityRecord> {
    let mut unique: Vec<UniversityRecord> = Vec::with_capacity(records.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for record in records {
        if let Some(&index) = positions.get(&record.id) {
            if richness(&record) > richness(&unique[index]) {
                unique[index] = record;
            }
            report.duplicates_removed += 1;
        } else {
            positions.insert(record.id.clone(), unique.len());
            unique.push(record);
        }
    }

    unique
}

/// Returns `true` if the description was changed.
fn repair_description(record: &mut UniversityRecord) -> bool {
    if record.description.starts_with(SITE_HEADER) {
        let extracted = CRAWLED_SENTENCES
            .captures(&record.description)
            .and_then(|caps| caps.get(1))
            .map(|m| {
                BOILERPLATE_PREFIX
                    .replace(m.as_str().trim(), "")
                    .into_owned()
            })
            .unwrap_or_default();

        record.description = if extracted.chars().count() < MIN_DESCRIPTION_CHARS
            || extracted.contains(NO_SENTENCES)
        {
            generic_description(&record.name, &record.location)
        } else {
            extracted
        };
        true
    } else if record.description.starts_with("//") {
        record.description = generic_description(&record.name, &record.location);
        true
    } else {
        false
    }
}

fn is_debris(content: &str) -> bool {
    let length = content.chars().count();
    content.contains("New sentences found on")
        || content.contains(SITE_HEADER)
        || content.contains("Pages fetched:")
        || content.starts_with("//")
        || (length > 500 && content.contains("Find out about") && content.contains("PhD"))
        || (length < 100
            && ["View courses", "Open Days", "JavaScript"]
                .iter()
                .any(|marker| content.contains(marker)))
}

/// Clears debris from the long-form fields, returning how many were cleared.
fn clear_debris_fields(record: &mut UniversityRecord) -> usize {
    let fields = [
        &mut record.entry_requirements,
        &mut record.accommodation,
        &mut record.international,
        &mut record.student_life,
        &mut record.admissions,
    ];

    let mut cleared = 0;
    for field in fields {
        if field.as_deref().is_some_and(is_debris) {
            *field = None;
            cleared += 1;
        }
    }
    cleared
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> UniversityRecord {
        UniversityRecord::new(id, name).with_location("Bath")
    }

    #[test]
    fn test_dedup_keeps_richer_entry_in_first_position() {
        let sparse = record("bath.ac.uk", "Bath");
        let other = record("york.ac.uk", "York");
        let rich = record("bath.ac.uk", "University of Bath")
            .with_description("A campus university on a hill above a World Heritage city.");

        let (cleaned, report) = clean(vec![sparse, other, rich]);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0].name, "University of Bath");
        assert_eq!(cleaned[1].name, "York");
    }

    #[test]
    fn test_dedup_keeps_first_on_tie() {
        let first = record("bath.ac.uk", "First");
        let second = record("bath.ac.uk", "Second");
        let (cleaned, _) = clean(vec![first, second]);
        assert_eq!(cleaned[0].name, "First");
    }

    #[test]
    fn test_crawler_transcript_is_extracted() {
        let text = "Bath is a leading university with a beautiful campus and strong graduate prospects.";
        let rec = record("bath.ac.uk", "Bath").with_description(format!(
            "# Site: https://www.bath.ac.uk\nPages fetched: 4\nNew sentences found on https://www.bath.ac.uk/about: Close Or Browse: {text}"
        ));
        let (cleaned, report) = clean(vec![rec]);
        assert_eq!(cleaned[0].description, text);
        assert_eq!(report.descriptions_rewritten, 1);
    }

    #[test]
    fn test_short_transcript_gets_generic_sentence() {
        let rec = record("bath.ac.uk", "Bath")
            .with_description("# Site: x\nNew sentences found on https://x: Too short.");
        let (cleaned, _) = clean(vec![rec]);
        assert_eq!(cleaned[0].description, generic_description("Bath", "Bath"));
    }

    #[test]
    fn test_no_sentences_marker_gets_generic_sentence() {
        let filler = "x".repeat(80);
        let rec = record("bath.ac.uk", "Bath").with_description(format!(
            "# Site: x\nNew sentences found on https://x: (No sentences captured.) {filler}"
        ));
        let (cleaned, _) = clean(vec![rec]);
        assert!(cleaned[0].description.starts_with("Bath is a higher education"));
    }

    #[test]
    fn test_slash_prefixed_description() {
        let rec = UniversityRecord::new("abdn.ac.uk", "Aberdeen")
            .with_description("//abdn.ac.uk: menu search");
        let (cleaned, report) = clean(vec![rec]);
        assert_eq!(
            cleaned[0].description,
            "Aberdeen is a higher education institution located in the UK. \
             It offers a variety of undergraduate and postgraduate programs."
        );
        assert_eq!(report.descriptions_rewritten, 1);
    }

    #[test]
    fn test_clean_description_untouched() {
        let rec = record("bath.ac.uk", "Bath").with_description("A fine place to study.");
        let (cleaned, report) = clean(vec![rec]);
        assert_eq!(cleaned[0].description, "A fine place to study.");
        assert_eq!(report, CleaningReport::default());
    }

    #[test]
    fn test_debris_fields_cleared() {
        let mut rec = record("bath.ac.uk", "Bath");
        rec.entry_requirements = Some("View courses and Open Days".to_string());
        rec.accommodation = Some("Pages fetched: 12".to_string());
        rec.international = Some("//bath.ac.uk/international".to_string());
        rec.student_life = Some(format!("Find out about PhD study. {}", "More. ".repeat(100)));
        rec.admissions = Some("Apply through UCAS by the January deadline.".to_string());

        let (cleaned, report) = clean(vec![rec]);
        let r = &cleaned[0];
        assert_eq!(report.fields_cleared, 4);
        assert!(r.entry_requirements.is_none());
        assert!(r.accommodation.is_none());
        assert!(r.international.is_none());
        assert!(r.student_life.is_none());
        assert!(r.admissions.is_some());
    }

    #[test]
    fn test_report_display() {
        let report = CleaningReport {
            duplicates_removed: 2,
            descriptions_rewritten: 3,
            fields_cleared: 1,
        };
        assert_eq!(
            report.to_string(),
            "removed 2 duplicate(s), rewrote 3 description(s), cleared 1 field(s)"
        );
    }
}
