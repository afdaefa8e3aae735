use serde::Serialize;

use crate::analyzers::sentiment::{SentimentLabel, Tagged};

/// Comments split by polarity. Neutral and unclassifiable comments are
/// counted but appear in neither list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Partitions {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub neutral: usize,
    pub failed: usize,
}

/// Zips `comments` with their tags (same order) into [`Partitions`].
pub fn partition(comments: &[String], tags: &[Tagged]) -> Partitions {
    let mut out = Partitions::default();

    for (comment, tag) in comments.iter().zip(tags) {
        match tag {
            Ok(SentimentLabel::Positive) => out.positive.push(comment.clone()),
            Ok(SentimentLabel::Negative) => out.negative.push(comment.clone()),
            Ok(SentimentLabel::Neutral) => out.neutral += 1,
            Err(_) => out.failed += 1,
        }
    }

    out
}
