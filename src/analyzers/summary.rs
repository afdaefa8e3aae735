//! Summarizes one partition of comments.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::{JoinPolicy, SummarySettings};
use crate::error::SummarizationError;
use crate::services::Summarizer;

/// What the report shows under a partition's summary heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryOutcome {
    /// Partition was empty; the summarizer was not called.
    NoContent,
    Completed {
        text: String,
        /// Per-comment calls that failed and were left out of `text`.
        failed_chunks: usize,
    },
    Failed {
        message: String,
    },
}

impl SummaryOutcome {
    fn failed(err: SummarizationError) -> Self {
        SummaryOutcome::Failed {
            message: err.to_string(),
        }
    }
}

async fn call(
    summarizer: &dyn Summarizer,
    text: &str,
    settings: &SummarySettings,
) -> Result<String, SummarizationError> {
    summarizer
        .summarize(text, settings.max_length, settings.min_length)
        .await
        .map_err(|e| SummarizationError::new(format!("{e:#}")))
}

/// Summarizes `comments` according to `settings.join`.
#[tracing::instrument(skip(summarizer, comments), fields(comment_count = comments.len()))]
pub async fn summarize_partition(
    summarizer: &dyn Summarizer,
    comments: &[String],
    settings: &SummarySettings,
) -> SummaryOutcome {
    if comments.is_empty() {
        return SummaryOutcome::NoContent;
    }

    match settings.join {
        JoinPolicy::Joined => match call(summarizer, &comments.join("\n"), settings).await {
            Ok(text) => {
                info!(chars = text.len(), "Partition summarized");
                SummaryOutcome::Completed {
                    text,
                    failed_chunks: 0,
                }
            }
            Err(e) => {
                warn!(error = %e, "Summarization failed");
                SummaryOutcome::failed(e)
            }
        },
        JoinPolicy::PerComment => {
            let mut pieces = Vec::with_capacity(comments.len());
            let mut first_error = None;
            let mut failed_chunks = 0;

            for comment in comments {
                match call(summarizer, comment, settings).await {
                    Ok(text) => pieces.push(text),
                    Err(e) => {
                        warn!(error = %e, "Chunk summarization failed");
                        failed_chunks += 1;
                        first_error.get_or_insert(e);
                    }
                }
            }

            match first_error {
                Some(e) if pieces.is_empty() => SummaryOutcome::failed(e),
                _ => SummaryOutcome::Completed {
                    text: pieces.join(" "),
                    failed_chunks,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::Mutex;

    /// Echoes the input upper-cased; fails on inputs containing "boom".
    struct EchoSummarizer {
        calls: Mutex<Vec<(String, u32, u32)>>,
    }

    impl EchoSummarizer {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, u32, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Summarizer for EchoSummarizer {
        async fn summarize(&self, text: &str, max_length: u32, min_length: u32) -> anyhow::Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push((text.to_string(), max_length, min_length));
            if text.contains("boom") {
                return Err(anyhow!("CUDA out of memory"));
            }
            Ok(text.to_uppercase())
        }
    }

    fn settings(join: JoinPolicy) -> SummarySettings {
        SummarySettings {
            max_length: 200,
            min_length: 50,
            join,
        }
    }

    fn comments(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_empty_partition_skips_collaborator() {
        let summarizer = EchoSummarizer::new();
        let outcome = summarize_partition(&summarizer, &[], &settings(JoinPolicy::Joined)).await;
        assert_eq!(outcome, SummaryOutcome::NoContent);
        assert!(summarizer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_joined_is_one_newline_call() {
        let summarizer = EchoSummarizer::new();
        let outcome = summarize_partition(
            &summarizer,
            &comments(&["a", "b"]),
            &settings(JoinPolicy::Joined),
        )
        .await;

        assert_eq!(
            outcome,
            SummaryOutcome::Completed {
                text: "A\nB".to_string(),
                failed_chunks: 0
            }
        );
        assert_eq!(summarizer.calls(), vec![("a\nb".to_string(), 200, 50)]);
    }

    #[tokio::test]
    async fn test_joined_failure_is_captured() {
        let summarizer = EchoSummarizer::new();
        let outcome = summarize_partition(
            &summarizer,
            &comments(&["fine", "boom"]),
            &settings(JoinPolicy::Joined),
        )
        .await;

        assert_eq!(
            outcome,
            SummaryOutcome::Failed {
                message: "Error summarizing text: CUDA out of memory".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_per_comment_joins_with_space_and_counts_failures() {
        let summarizer = EchoSummarizer::new();
        let outcome = summarize_partition(
            &summarizer,
            &comments(&["one", "boom", "two"]),
            &settings(JoinPolicy::PerComment),
        )
        .await;

        assert_eq!(
            outcome,
            SummaryOutcome::Completed {
                text: "ONE TWO".to_string(),
                failed_chunks: 1
            }
        );
        assert_eq!(summarizer.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_per_comment_all_failed() {
        let summarizer = EchoSummarizer::new();
        let outcome = summarize_partition(
            &summarizer,
            &comments(&["boom", "boom again"]),
            &settings(JoinPolicy::PerComment),
        )
        .await;
        assert!(matches!(outcome, SummaryOutcome::Failed { .. }));
    }
}
