//! University catalogue records.

use serde::{Deserialize, Deserializer, Serialize};

/// Relative cost of living around a campus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostOfLiving {
    /// Cheaper than average.
    Low,
    /// About average.
    Medium,
    /// Expensive.
    High,
}

impl CostOfLiving {
    /// Returns the string representation used in serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for CostOfLiving {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// League table positions. Lower is better for `guardian` and `the`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rankings {
    /// Guardian University Guide position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian: Option<u32>,
    /// Times Higher Education world ranking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub the: Option<u32>,
    /// National Student Survey satisfaction, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nss: Option<f32>,
}

/// Facts about the town or city around the campus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationStats {
    /// Cost of living band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_of_living: Option<CostOfLiving>,
    /// Nightlife rating on a 1-5 scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nightlife: Option<f32>,
    /// Short vibe descriptor, e.g. `Historic & Friendly`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibe: Option<String>,
}

/// Facts about the campus itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampusStats {
    /// National sports ranking. Lower is better.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sports_ranking: Option<u32>,
    /// Share of international students, in percent.
    ///
    /// Accepts either a number or a string such as `"15%"`.
    #[serde(
        default,
        deserialize_with = "deserialize_percent",
        skip_serializing_if = "Option::is_none"
    )]
    pub international_students: Option<f32>,
}

/// How to get to the campus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelInfo {
    /// Nearest rail connections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub train: Option<String>,
    /// Bus routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus: Option<String>,
    /// Nearby airports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airports: Option<Vec<String>>,
    /// Local transport notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_transport: Option<String>,
}

/// Headline statistics as published by the university.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineStats {
    /// Student satisfaction, free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_satisfaction: Option<String>,
    /// Graduate employment rate, free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_rate: Option<String>,
    /// International student share, free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub international_students: Option<String>,
}

/// A single catalogue entry.
///
/// Records are loaded once and never modified; see [`crate::catalogue::Catalogue`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityRecord {
    /// Stable identifier, usually the university's domain.
    pub id: String,
    /// URL slug.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Town, city or region.
    #[serde(default)]
    pub location: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Feature tags.
    #[serde(default)]
    pub features: Vec<String>,
    /// Hero image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// League table positions.
    #[serde(default)]
    pub rankings: Rankings,
    /// Cost, nightlife and vibe of the surrounding area.
    #[serde(default)]
    pub location_stats: LocationStats,
    /// Sports ranking and international share.
    #[serde(default)]
    pub campus_stats: CampusStats,
    /// Typical offers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_requirements: Option<String>,
    /// Accommodation overview.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accommodation: Option<String>,
    /// International student support.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub international: Option<String>,
    /// Student life overview.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_life: Option<String>,
    /// How to apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admissions: Option<String>,
    /// Travel information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_info: Option<TravelInfo>,
    /// Faculty names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculties: Option<Vec<String>>,
    /// Published headline statistics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<HeadlineStats>,
}

impl UniversityRecord {
    /// Creates a record with the required identity fields.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        let slug = id.replace('.', "-");
        Self {
            id,
            slug,
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the feature tags.
    #[must_use]
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the nightlife rating.
    #[must_use]
    pub const fn with_nightlife(mut self, rating: f32) -> Self {
        self.location_stats.nightlife = Some(rating);
        self
    }

    /// Sets the vibe descriptor.
    #[must_use]
    pub fn with_vibe(mut self, vibe: impl Into<String>) -> Self {
        self.location_stats.vibe = Some(vibe.into());
        self
    }

    /// Sets the sports ranking.
    #[must_use]
    pub const fn with_sports_ranking(mut self, ranking: u32) -> Self {
        self.campus_stats.sports_ranking = Some(ranking);
        self
    }

    /// Sports ranking, treating a missing or zero value as 100.
    ///
    /// Scraped records use `0` for "not ranked".
    #[must_use]
    pub fn effective_sports_ranking(&self) -> u32 {
        self.campus_stats
            .sports_ranking
            .filter(|&ranking| ranking > 0)
            .unwrap_or(100)
    }

    /// Nightlife rating, if known.
    #[must_use]
    pub const fn nightlife(&self) -> Option<f32> {
        self.location_stats.nightlife
    }

    /// Vibe descriptor, if known.
    #[must_use]
    pub fn vibe(&self) -> Option<&str> {
        self.location_stats.vibe.as_deref()
    }

    /// Number of populated top-level fields.
    ///
    /// Used to decide which of two duplicate entries carries more data.
    #[must_use]
    pub fn populated_field_count(&self) -> usize {
        let required = [
            !self.id.is_empty(),
            !self.slug.is_empty(),
            !self.name.is_empty(),
            !self.location.is_empty(),
            !self.description.is_empty(),
            !self.features.is_empty(),
            true, // rankings
            true, // locationStats
            true, // campusStats
        ];
        let optional = [
            self.image_url.is_some(),
            self.entry_requirements.is_some(),
            self.accommodation.is_some(),
            self.international.is_some(),
            self.student_life.is_some(),
            self.admissions.is_some(),
            self.travel_info.is_some(),
            self.faculties.is_some(),
            self.stats.is_some(),
        ];
        required.iter().chain(optional.iter()).filter(|&&b| b).count()
    }
}

/// Accepts `15`, `15.5`, `"15%"` or `"15"`; anything unparseable becomes `None`.
fn deserialize_percent<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Percent {
        Number(f32),
        Text(String),
    }

    let value = Option::<Percent>::deserialize(deserializer)?;
    Ok(value.and_then(|p| match p {
        Percent::Number(n) => Some(n),
        Percent::Text(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
    }))
}
