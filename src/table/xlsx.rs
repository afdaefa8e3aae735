//! Excel workbook ingestion. Only the first worksheet is read.

use calamine::{Data, Reader, Xlsx, open_workbook};
use csv::StringRecord;
use tracing::debug;

use crate::error::{Error, Result};
use crate::table::reader::RawTable;
use crate::table::schema::normalize_header;

/// Date cells are rendered in this form so they parse like CSV timestamps.
const CELL_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Reads the first worksheet of an `.xlsx` workbook. The first row is the
/// header; every cell is rendered to text so the result matches a CSV read.
pub fn read_workbook(path: &str) -> Result<RawTable> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).map_err(|e| Error::Spreadsheet(format!("{path}: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Spreadsheet(format!("{path}: workbook has no worksheets")))?
        .map_err(|e| Error::Spreadsheet(format!("{path}: {e}")))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(cells) => cells.iter().map(|c| normalize_header(&cell_text(c))).collect(),
        None => Vec::new(),
    };

    let rows: Vec<StringRecord> = rows
        .map(|cells| StringRecord::from(cells.iter().map(cell_text).collect::<Vec<_>>()))
        .collect();

    debug!(path, rows = rows.len(), "Read worksheet");
    Ok(RawTable { headers, rows })
}

/// Renders one cell as the text a CSV export would have held.
pub(crate) fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format(CELL_DATETIME_FORMAT).to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn test_numeric_cells_read_like_csv() {
        assert_eq!(cell_text(&Data::Float(4.0)), "4");
        assert_eq!(cell_text(&Data::Float(3.5)), "3.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
    }

    #[test]
    fn test_blank_and_error_cells_are_empty() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::Error(CellErrorType::NA)), "");
    }

    #[test]
    fn test_text_cells_pass_through() {
        assert_eq!(cell_text(&Data::String("Y".into())), "Y");
        assert_eq!(
            cell_text(&Data::DateTimeIso("2024-03-15T10:30:00".into())),
            "2024-03-15T10:30:00"
        );
    }

    #[test]
    fn test_missing_workbook_is_error() {
        assert!(matches!(
            read_workbook("/nonexistent/feedback.xlsx"),
            Err(Error::Spreadsheet(_))
        ));
    }
}
