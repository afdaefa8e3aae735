//! Ingestion for feedback exports: CSV, gzip CSV and xlsx workbooks.

use csv::{ReaderBuilder, StringRecord};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::table::schema::normalize_header;
use crate::table::xlsx::read_workbook;

/// Header row and data rows exactly as read, before any typing.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<StringRecord>,
}

/// Reads an export from disk, picking the format from the extension:
/// `.xlsx` is read as a workbook, `.gz` is decompressed CSV, anything else
/// is plain CSV.
pub fn read_table(path: &str) -> Result<RawTable> {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    debug!(path, extension = extension.as_deref(), "Reading feedback table");

    match extension.as_deref() {
        Some("xlsx") => read_workbook(path),
        Some("gz") => read_table_from(GzDecoder::new(File::open(path)?)),
        _ => read_table_from(File::open(path)?),
    }
}

/// Reads a CSV export from any reader. Short rows are tolerated; their
/// missing cells read as blank.
pub fn read_table_from<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr.headers()?.iter().map(normalize_header).collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        rows.push(result?);
    }

    Ok(RawTable { headers, rows })
}
