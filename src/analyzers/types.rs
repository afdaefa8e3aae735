//! Data types produced by one pipeline run.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::aggregate::AttributeSummary;
use crate::analyzers::summary::SummaryOutcome;
use crate::query::Query;

/// One polarity bucket: its comments in source order and their summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionReport {
    pub comments: Vec<String>,
    pub summary: SummaryOutcome,
}

/// Everything computed for a query that matched at least one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub positive: PartitionReport,
    pub negative: PartitionReport,
    pub neutral_comments: usize,
    pub unclassified_comments: usize,
    pub attributes: Vec<AttributeSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportOutcome {
    /// Nothing matched the subject/year filters.
    NoFeedback,
    Analyzed(Analysis),
}

/// Complete result of one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackReport {
    pub generated_at: DateTime<Utc>,
    pub query: Query,
    pub include_self_feedback: bool,
    pub matched_records: usize,
    pub outcome: ReportOutcome,
}

impl FeedbackReport {
    pub fn analysis(&self) -> Option<&Analysis> {
        match &self.outcome {
            ReportOutcome::Analyzed(a) => Some(a),
            ReportOutcome::NoFeedback => None,
        }
    }
}
