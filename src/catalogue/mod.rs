//! The read-only university catalogue.
//!
//! A catalogue is a JSON array of [`UniversityRecord`]s, loaded once at startup
//! and shared by reference afterwards. Cloning a [`Catalogue`] is cheap.

mod cleaning;

pub use cleaning::{CleaningReport, clean, generic_description};

use crate::models::UniversityRecord;
use crate::{Error, Result};
use std::path::Path;
use std::sync::Arc;

/// Immutable, shareable set of university records.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    records: Arc<[UniversityRecord]>,
}

impl Catalogue {
    /// Loads a catalogue from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the file cannot be read and
    /// [`Error::InvalidInput`] if it is not a JSON array of records.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_catalogue".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        let catalogue = Self::from_json(&contents)?;
        tracing::info!(
            path = %path.display(),
            records = catalogue.len(),
            "Loaded university catalogue"
        );
        Ok(catalogue)
    }

    /// Parses a catalogue from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<UniversityRecord> = serde_json::from_str(json)
            .map_err(|e| Error::InvalidInput(format!("malformed catalogue JSON: {e}")))?;
        Ok(Self::from_records(records))
    }

    /// Builds a catalogue from records already in memory.
    #[must_use]
    pub fn from_records(records: Vec<UniversityRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// All records, in file order.
    #[must_use]
    pub fn records(&self) -> &[UniversityRecord] {
        &self.records
    }

    /// Looks up a record by slug.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record has the slug.
    pub fn by_slug(&self, slug: &str) -> Result<&UniversityRecord> {
        self.records
            .iter()
            .find(|r| r.slug == slug)
            .ok_or_else(|| Error::NotFound(format!("university '{slug}'")))
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the catalogue has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Runs the cleaning pass and returns a new catalogue.
    #[must_use]
    pub fn cleaned(&self) -> (Self, CleaningReport) {
        let (records, report) = clean(self.records.to_vec());
        (Self::from_records(records), report)
    }
}
