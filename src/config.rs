//! Pipeline configuration.
//!
//! Every field has a default matching the standard performance-feedback
//! export, so a config file only needs to list what differs:
//! ```json
//! {
//!   "summarizer_backend": "bart_large_cnn",
//!   "summary_join": "per_comment",
//!   "max_parallelism": 4
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_SENTIMENT_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";
pub const DEFAULT_INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co/models";

static DEFAULT_ATTRIBUTES: &[&str] = &[
    "Nimble Learning",
    "Communicates Effectively",
    "Drives Results",
    "Customer Focus",
    "Business Insight",
    "Cultivates Innovation",
    "Ensures Accountability",
    "Manages Ambiguity",
    "Manages Complexity",
    "Decision Quality",
    "Professionalism and Attitude",
];

/// Names of the columns the pipeline reads from the input table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub subject: String,
    pub comment: String,
    pub created_at: String,
    pub self_feedback: String,
    pub attributes: Vec<String>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            subject: "emailid_feedback_for".to_string(),
            comment: "Overall Feedback Comments".to_string(),
            created_at: "CREATED_DATE_TIME".to_string(),
            self_feedback: "self_feedback".to_string(),
            attributes: DEFAULT_ATTRIBUTES.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl ColumnMap {
    /// All columns the schema check insists on, in report order.
    pub fn required_columns(&self) -> Vec<String> {
        let mut cols = vec![self.subject.clone(), self.comment.clone()];
        cols.extend(self.attributes.iter().cloned());
        cols.push(self.created_at.clone());
        cols.push(self.self_feedback.clone());
        cols
    }
}

/// Which hosted summarization model to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarizerBackend {
    #[default]
    Distilbart,
    BartLargeCnn,
}

impl SummarizerBackend {
    pub fn model_id(&self) -> &'static str {
        match self {
            SummarizerBackend::Distilbart => "sshleifer/distilbart-cnn-12-6",
            SummarizerBackend::BartLargeCnn => "facebook/bart-large-cnn",
        }
    }

    /// `(max_length, min_length)` the backend is called with unless overridden.
    pub fn default_lengths(&self) -> (u32, u32) {
        match self {
            SummarizerBackend::Distilbart => (200, 50),
            SummarizerBackend::BartLargeCnn => (10000, 1),
        }
    }
}

/// How a partition's comments are handed to the summarizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinPolicy {
    /// Newline-joined, one call per partition.
    #[default]
    Joined,
    /// One call per comment, outputs joined with a space.
    PerComment,
}

/// Length bounds and join policy for one summarization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummarySettings {
    pub max_length: u32,
    pub min_length: u32,
    pub join: JoinPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub columns: ColumnMap,
    pub parallel_classification: bool,
    pub max_parallelism: usize,
    pub summarizer_backend: SummarizerBackend,
    pub summary_join: JoinPolicy,
    pub max_length: Option<u32>,
    pub min_length: Option<u32>,
    pub support_self_feedback_filter: bool,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMap::default(),
            parallel_classification: true,
            max_parallelism: 8,
            summarizer_backend: SummarizerBackend::default(),
            summary_join: JoinPolicy::default(),
            max_length: None,
            min_length: None,
            support_self_feedback_filter: true,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl PipelineConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{path}: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_parallelism == 0 {
            return Err(Error::Config("max_parallelism must be at least 1".into()));
        }
        if self.columns.attributes.is_empty() {
            return Err(Error::Config("at least one attribute column is required".into()));
        }
        Ok(())
    }

    pub fn summary_settings(&self) -> SummarySettings {
        let (max_default, min_default) = self.summarizer_backend.default_lengths();
        SummarySettings {
            max_length: self.max_length.unwrap_or(max_default),
            min_length: self.min_length.unwrap_or(min_default),
            join: self.summary_join,
        }
    }
}
