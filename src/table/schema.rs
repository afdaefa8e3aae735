//! Required-column check for an ingested table.

use crate::error::{Error, Result};

/// Outcome of comparing a header row against the required columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCheck {
    pub missing: Vec<String>,
}

impl SchemaCheck {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }

    /// Converts a failed check into [`Error::Schema`].
    pub fn ensure(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::Schema {
                missing: self.missing,
            })
        }
    }
}

/// Normalizes a raw header cell: strips a UTF-8 BOM and surrounding whitespace.
pub fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

/// Reports which of `required` are absent from `headers`, in `required` order.
pub fn check_columns(headers: &[String], required: &[String]) -> SchemaCheck {
    let missing = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .cloned()
        .collect();

    SchemaCheck { missing }
}
