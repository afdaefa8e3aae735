//! Selects the records that belong to one query.

use chrono::Datelike;
use serde::Serialize;

use crate::query::Query;
use crate::table::{FeedbackRecord, FeedbackTable};

/// Records surviving subject/year/self-feedback filtering, in table order.
///
/// Records are cloned out of the source table so the table itself is never
/// touched by later stages.
#[derive(Debug, Clone, Serialize)]
pub struct FilteredSet {
    pub records: Vec<FeedbackRecord>,
    /// The configured attribute columns that exist in the source table.
    pub attribute_columns: Vec<String>,
}

impl FilteredSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Non-blank comments, in record order.
    pub fn comments(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|r| r.comment_text().map(str::to_string))
            .collect()
    }
}

/// Applies `query` to `table`.
///
/// `attributes` are the configured attribute names; only those present in the
/// table header are carried into [`FilteredSet::attribute_columns`].
pub fn filter_records(
    table: &FeedbackTable,
    query: &Query,
    include_self_feedback: bool,
    attributes: &[String],
) -> FilteredSet {
    let needle = query.subject_filter().to_lowercase();
    let year = query.year_filter();

    let records = table
        .records()
        .iter()
        .filter(|r| subject_matches(r, &needle))
        .filter(|r| year_matches(r, year))
        .filter(|r| include_self_feedback || !r.is_self_feedback)
        .cloned()
        .collect();

    let attribute_columns = attributes
        .iter()
        .filter(|a| table.has_column(a))
        .cloned()
        .collect();

    FilteredSet {
        records,
        attribute_columns,
    }
}

fn subject_matches(record: &FeedbackRecord, needle: &str) -> bool {
    record
        .subject_identifier
        .as_deref()
        .is_some_and(|s| s.to_lowercase().contains(needle))
}

fn year_matches(record: &FeedbackRecord, year: Option<i32>) -> bool {
    match year {
        None => true,
        Some(y) => record.created_at.is_some_and(|d| d.year() == y),
    }
}
