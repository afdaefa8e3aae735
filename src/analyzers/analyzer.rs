use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::analyzers::aggregate::aggregate_attributes;
use crate::analyzers::partition::partition;
use crate::analyzers::sentiment::{Dispatch, tag_comments};
use crate::analyzers::summary::summarize_partition;
use crate::analyzers::types::{Analysis, FeedbackReport, PartitionReport, ReportOutcome};
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::filter::filter_records;
use crate::query::Query;
use crate::services::{SentimentClassifier, Summarizer};
use crate::table::FeedbackTable;

/// The feedback aggregation pipeline with its collaborators injected.
///
/// Built once per process and reused for every request; holds no
/// per-request state.
pub struct Pipeline {
    classifier: Arc<dyn SentimentClassifier>,
    summarizer: Arc<dyn Summarizer>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        classifier: Arc<dyn SentimentClassifier>,
        summarizer: Arc<dyn Summarizer>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            classifier,
            summarizer,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn dispatch(&self) -> Dispatch {
        if self.config.parallel_classification {
            Dispatch::Parallel(self.config.max_parallelism)
        } else {
            Dispatch::Sequential
        }
    }

    /// Runs filtering, tagging, partitioning, summarization and attribute
    /// averaging for one query.
    ///
    /// # Errors
    ///
    /// [`Error::EmptySubject`] when the query names no subject. Classifier
    /// and summarizer failures never surface here; they are recorded in the
    /// report.
    #[tracing::instrument(skip(self, table), fields(subject = %query.subject_filter(), year = ?query.year_filter()))]
    pub async fn analyze(
        &self,
        table: &FeedbackTable,
        query: &Query,
        include_self_feedback: bool,
    ) -> Result<FeedbackReport> {
        if query.subject_filter().is_empty() {
            return Err(Error::EmptySubject);
        }

        let include_self_feedback =
            include_self_feedback || !self.config.support_self_feedback_filter;
        let attributes = &self.config.columns.attributes;

        let filtered = filter_records(table, query, include_self_feedback, attributes);
        info!(matched = filtered.len(), total = table.len(), "Records filtered");

        let mut report = FeedbackReport {
            generated_at: Utc::now(),
            query: query.clone(),
            include_self_feedback,
            matched_records: filtered.len(),
            outcome: ReportOutcome::NoFeedback,
        };

        if filtered.is_empty() {
            warn!(query = %query, "No feedback found");
            return Ok(report);
        }

        let comments = filtered.comments();
        let tags = tag_comments(self.classifier.clone(), &comments, self.dispatch()).await;
        let partitions = partition(&comments, &tags);
        info!(
            positive = partitions.positive.len(),
            negative = partitions.negative.len(),
            neutral = partitions.neutral,
            failed = partitions.failed,
            "Comments partitioned"
        );

        let settings = self.config.summary_settings();
        let positive_summary =
            summarize_partition(self.summarizer.as_ref(), &partitions.positive, &settings).await;
        let negative_summary =
            summarize_partition(self.summarizer.as_ref(), &partitions.negative, &settings).await;

        let attributes = aggregate_attributes(&filtered, attributes);

        report.outcome = ReportOutcome::Analyzed(Analysis {
            positive: PartitionReport {
                comments: partitions.positive,
                summary: positive_summary,
            },
            negative: PartitionReport {
                comments: partitions.negative,
                summary: negative_summary,
            },
            neutral_comments: partitions.neutral,
            unclassified_comments: partitions.failed,
            attributes,
        });

        Ok(report)
    }
}
