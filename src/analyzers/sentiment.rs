//! Sentiment tagging over a batch of comments.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::error::ClassificationError;
use crate::services::SentimentClassifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Maps a collaborator label. Only the exact strings `POSITIVE` and
    /// `NEGATIVE` carry polarity.
    pub fn from_label(label: &str) -> Self {
        match label {
            "POSITIVE" => SentimentLabel::Positive,
            "NEGATIVE" => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        }
    }
}

/// Per-comment outcome: a label, or the captured failure for that comment.
pub type Tagged = Result<SentimentLabel, ClassificationError>;

/// How the batch is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Sequential,
    /// At most this many classifier calls in flight.
    Parallel(usize),
}

/// Classifies a single comment, capturing any failure.
pub async fn tag_comment(classifier: &dyn SentimentClassifier, comment: &str) -> Tagged {
    match classifier.classify(comment).await {
        Ok(label) => Ok(SentimentLabel::from_label(&label)),
        Err(e) => Err(ClassificationError::new(format!("{e:#}"))),
    }
}

/// Classifies every comment. The returned vector is index-aligned with
/// `comments` no matter in which order the calls complete.
#[tracing::instrument(skip(classifier, comments), fields(comment_count = comments.len()))]
pub async fn tag_comments(
    classifier: Arc<dyn SentimentClassifier>,
    comments: &[String],
    dispatch: Dispatch,
) -> Vec<Tagged> {
    let tagged = match dispatch {
        Dispatch::Sequential => {
            let mut out = Vec::with_capacity(comments.len());
            for comment in comments {
                out.push(tag_comment(classifier.as_ref(), comment).await);
            }
            out
        }
        Dispatch::Parallel(limit) => tag_parallel(classifier, comments, limit.max(1)).await,
    };

    let failed = tagged.iter().filter(|t| t.is_err()).count();
    if failed > 0 {
        warn!(failed, total = tagged.len(), "Some comments could not be classified");
    } else {
        info!(total = tagged.len(), "Comments classified");
    }

    tagged
}

async fn tag_parallel(
    classifier: Arc<dyn SentimentClassifier>,
    comments: &[String],
    limit: usize,
) -> Vec<Tagged> {
    let semaphore = Arc::new(Semaphore::new(limit));
    let mut tasks = Vec::with_capacity(comments.len());

    for (index, comment) in comments.iter().enumerate() {
        let sem = semaphore.clone();
        let classifier = classifier.clone();
        let comment = comment.clone();

        let task = tokio::spawn(async move {
            let _permit = sem
                .acquire_owned()
                .await
                .map_err(|e| ClassificationError::new(e.to_string()))?;
            debug!(index, "Classifying comment");
            tag_comment(classifier.as_ref(), &comment).await
        });
        tasks.push((index, task));
    }

    let mut slots: Vec<Option<Tagged>> = vec![None; comments.len()];
    for (index, task) in tasks {
        let result = match task.await {
            Ok(tagged) => tagged,
            Err(e) => Err(ClassificationError::new(format!("classification task failed: {e}"))),
        };
        slots[index] = Some(result);
    }

    slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| Err(ClassificationError::new("missing result"))))
        .collect()
}
