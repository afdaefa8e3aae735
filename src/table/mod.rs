//! Typed view of an uploaded feedback export.
//!
//! [`read_table`] loads raw rows from CSV or xlsx, [`FeedbackTable::from_raw`] checks the
//! header against the configured [`ColumnMap`] and types each row into a
//! [`FeedbackRecord`].

mod reader;
mod record;
pub mod schema;
mod xlsx;

pub use reader::{RawTable, read_table, read_table_from};
pub use record::{FeedbackRecord, SELF_FEEDBACK_MARKER, parse_score, parse_timestamp};

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::ColumnMap;
use crate::error::Result;
use record::non_blank;
use schema::check_columns;

/// A validated, typed feedback table. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct FeedbackTable {
    columns: Vec<String>,
    records: Vec<FeedbackRecord>,
}

impl FeedbackTable {
    /// Validates `raw` against `map` and types every row.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Schema`] listing every required column that
    /// is missing from the header.
    pub fn from_raw(raw: RawTable, map: &ColumnMap) -> Result<Self> {
        check_columns(&raw.headers, &map.required_columns()).ensure()?;

        let index_of = |name: &str| raw.headers.iter().position(|h| h == name);
        let subject_idx = index_of(&map.subject);
        let comment_idx = index_of(&map.comment);
        let created_idx = index_of(&map.created_at);
        let self_idx = index_of(&map.self_feedback);
        let attr_idx: Vec<(&String, usize)> = map
            .attributes
            .iter()
            .filter_map(|a| index_of(a).map(|i| (a, i)))
            .collect();

        let cell = |row: &csv::StringRecord, idx: Option<usize>| -> Option<String> {
            idx.and_then(|i| row.get(i)).and_then(non_blank)
        };

        let mut unparsed_timestamps = 0usize;
        let mut records = Vec::with_capacity(raw.rows.len());

        for (row_idx, row) in raw.rows.iter().enumerate() {
            let created_raw = cell(row, created_idx);
            let created_at = created_raw.as_deref().and_then(parse_timestamp);
            if created_raw.is_some() && created_at.is_none() {
                unparsed_timestamps += 1;
                debug!(row = row_idx, value = ?created_raw, "Unparseable timestamp, treating as null");
            }

            let mut attribute_scores = BTreeMap::new();
            for (name, i) in &attr_idx {
                if let Some(score) = row.get(*i).and_then(parse_score) {
                    attribute_scores.insert((*name).clone(), score);
                }
            }

            records.push(FeedbackRecord {
                row: row_idx,
                subject_identifier: cell(row, subject_idx),
                comment: cell(row, comment_idx),
                attribute_scores,
                created_at,
                is_self_feedback: self_idx.and_then(|i| row.get(i)) == Some(SELF_FEEDBACK_MARKER),
            });
        }

        info!(
            rows = records.len(),
            columns = raw.headers.len(),
            unparsed_timestamps,
            "Feedback table loaded"
        );

        Ok(Self {
            columns: raw.headers,
            records,
        })
    }

    pub fn records(&self) -> &[FeedbackRecord] {
        &self.records
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
