//! Exact name mentions in generated replies.

use crate::models::UniversityRecord;

/// Returns catalogue records whose name appears verbatim in `reply`.
///
/// Matching is a case-insensitive substring test. Records with a blank name are
/// never matched. Results keep catalogue order and stop at `limit`.
#[must_use]
pub fn mentioned_universities<'a>(
    reply: &str,
    catalogue: &'a [UniversityRecord],
    limit: usize,
) -> Vec<&'a UniversityRecord> {
    if reply.trim().is_empty() || limit == 0 {
        return Vec::new();
    }

    let reply_lower = reply.to_lowercase();
    catalogue
        .iter()
        .filter(|record| {
            let name = record.name.trim();
            !name.is_empty() && reply_lower.contains(&name.to_lowercase())
        })
        .take(limit)
        .collect()
}
