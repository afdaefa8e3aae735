//! Feedback analysis: sentiment tagging, partitioning, summarization and
//! attribute averaging, tied together by [`analyzer::Pipeline`].

pub mod aggregate;
pub mod analyzer;
pub mod partition;
pub mod sentiment;
pub mod summary;
pub mod types;
pub mod utility;
