//! Trait for a hosted sentiment classifier.

use anyhow::Result;

/// Labels a piece of text with a coarse polarity.
///
/// Implementations return the collaborator's raw label (e.g. `"POSITIVE"`);
/// mapping onto [`crate::analyzers::sentiment::SentimentLabel`] happens in
/// the tagger. Each call is independent and may fail on its own.
#[async_trait::async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<String>;
}
