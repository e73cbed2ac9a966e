// 📂 CSV Loader - Heading Ingestion
// Reads subject heading exports into (heading, count) records

use anyhow::{bail, Context, Result};
use std::path::Path;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Column the headings are read from when the caller does not override it
pub const DEFAULT_HEADING_COLUMN: &str = "NORMAL_HEADING";

/// HeadingRecord - One data row of the input CSV
///
/// The heading text is kept exactly as it appears in the file; casing is
/// applied later by the normalize stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRecord {
    pub heading: String,
    pub count: u64,
    pub line_number: usize, // Line in the source file (1-indexed, after header)
}

// ============================================================================
// LOADING
// ============================================================================

/// Load heading records from a CSV export.
///
/// The first row is always treated as a header row. The heading column is
/// located by name (`heading_column`); the count column is either located by
/// name (`count_column`) or defaults to the first column that is not the
/// heading column.
///
/// # Returns
/// * `Ok(Vec<HeadingRecord>)` - Records in file order (header-only file → empty)
/// * `Err(anyhow::Error)` - Unreadable file, missing column, or a malformed row
pub fn load_headings(
    file_path: &Path,
    heading_column: &str,
    count_column: Option<&str>,
) -> Result<Vec<HeadingRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(file_path)
        .with_context(|| format!("Failed to open file: {}", file_path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header row from {}", file_path.display()))?
        .clone();

    let heading_idx = match headers.iter().position(|h| h == heading_column) {
        Some(idx) => idx,
        None => bail!(
            "Column '{}' not found in {} (available columns: {})",
            heading_column,
            file_path.display(),
            column_list(&headers)
        ),
    };

    let count_idx = match count_column {
        Some(name) => match headers.iter().position(|h| h == name) {
            Some(idx) => idx,
            None => bail!(
                "Column '{}' not found in {} (available columns: {})",
                name,
                file_path.display(),
                column_list(&headers)
            ),
        },
        // Default: the first column that is not the heading column
        None => match (0..headers.len()).find(|&i| i != heading_idx) {
            Some(idx) => idx,
            None => bail!(
                "{} only has the heading column '{}'; a count column is required",
                file_path.display(),
                heading_column
            ),
        },
    };

    let mut records = Vec::new();

    for (line_num, result) in reader.records().enumerate() {
        let line = line_num + 2; // +2 because: 1-indexed + header row
        let record = result.with_context(|| {
            format!("Failed to parse CSV line {} in {}", line, file_path.display())
        })?;

        let heading = record.get(heading_idx).unwrap_or("").to_string();
        let raw_count = record.get(count_idx).unwrap_or("").trim();

        let count = raw_count.parse::<u64>().with_context(|| {
            format!(
                "Invalid frequency count {:?} for heading {:?} on line {} of {} (expected a non-negative integer)",
                raw_count,
                heading,
                line,
                file_path.display()
            )
        })?;

        records.push(HeadingRecord {
            heading,
            count,
            line_number: line,
        });
    }

    Ok(records)
}

/// Comma-separated column names for error messages
fn column_list(headers: &csv::StringRecord) -> String {
    headers.iter().collect::<Vec<_>>().join(", ")
}

// ============================================================================
// TESTS
// ============================================================================
