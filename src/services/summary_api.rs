//! Trait for a hosted text summarizer.

use anyhow::Result;

/// Condenses `text` into a summary bounded by `max_length` / `min_length`
/// (units are whatever the collaborator uses, usually tokens).
///
/// `min_length` larger than the input is passed through unchecked; how the
/// collaborator reacts is its own business.
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, max_length: u32, min_length: u32) -> Result<String>;
}
