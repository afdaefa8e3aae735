//! Collaborator seams for the external models.
//!
//! The pipeline only sees these traits. Concrete HTTP implementations live
//! in [`crate::infra`]; tests substitute in-memory fakes.

pub mod sentiment_api;
pub mod summary_api;

pub use sentiment_api::SentimentClassifier;
pub use summary_api::Summarizer;
