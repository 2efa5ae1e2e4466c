//! `catalogue` subcommands.

use super::write_json;
use crate::catalogue::{Catalogue, CleaningReport};
use crate::{Error, Result};
use std::io::{self, Write};
use std::path::Path;

/// Writes one line per record: slug, name and location.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_catalogue_table<W: Write>(writer: &mut W, catalogue: &Catalogue) -> io::Result<()> {
    let slug_width = catalogue
        .records()
        .iter()
        .map(|r| r.slug.len())
        .max()
        .unwrap_or(0)
        .max("SLUG".len())
        + 2;

    writeln!(writer, "{:<slug_width$}{:<40}LOCATION", "SLUG", "NAME")?;
    for record in catalogue.records() {
        writeln!(
            writer,
            "{:<slug_width$}{:<40}{}",
            record.slug, record.name, record.location
        )?;
    }
    Ok(())
}

/// Cleans the catalogue and writes it to `output` as pretty JSON.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if serialization or writing fails.
pub fn write_cleaned_catalogue(catalogue: &Catalogue, output: &Path) -> Result<CleaningReport> {
    let (cleaned, report) = catalogue.cleaned();
    let json = serde_json::to_string_pretty(cleaned.records()).map_err(|e| {
        Error::OperationFailed {
            operation: "serialize_catalogue".to_string(),
            cause: e.to_string(),
        }
    })?;
    std::fs::write(output, json).map_err(|e| Error::OperationFailed {
        operation: "write_catalogue".to_string(),
        cause: format!("{}: {e}", output.display()),
    })?;

    tracing::info!(
        output = %output.display(),
        records = cleaned.len(),
        "Wrote cleaned catalogue"
    );
    Ok(report)
}

/// Executes `catalogue list`.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn cmd_catalogue_list(
    catalogue: &Catalogue,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    write_catalogue_table(&mut io::stdout().lock(), catalogue)?;
    Ok(())
}

/// Executes `catalogue show <slug>`.
///
/// # Errors
///
/// Returns an error if the slug is unknown or output fails.
pub fn cmd_catalogue_show(
    catalogue: &Catalogue,
    slug: &str,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let record = catalogue.by_slug(slug)?;
    write_json(&mut io::stdout().lock(), record)
}

/// Executes `catalogue clean --output <file>`.
///
/// # Errors
///
/// Returns an error if the cleaned catalogue cannot be written.
pub fn cmd_catalogue_clean(
    catalogue: &Catalogue,
    output: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let report = write_cleaned_catalogue(catalogue, output)?;
    println!("Cleaned catalogue written to {}: {report}", output.display());
    Ok(())
}
