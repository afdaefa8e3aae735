//! Error types for the feedback pipeline.
//!
//! Only [`Error`] aborts a request. [`ClassificationError`] and
//! [`SummarizationError`] are carried as data inside the report so the
//! caller still sees whatever could be computed.

use thiserror::Error;

/// Result type for operations that abort the whole request.
pub type Result<T> = std::result::Result<T, Error>;

/// Request-fatal errors.
#[derive(Error, Debug)]
pub enum Error {
    /// The input table lacks one or more required columns.
    #[error("Required columns not found in the input file: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// The query left nothing to match the subject against.
    #[error("Query does not name a subject")]
    EmptySubject,

    /// The input file could not be decoded as CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Workbook could not be opened or has no readable worksheet
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),
}

/// A single comment the classifier could not label.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("classification failed: {message}")]
pub struct ClassificationError {
    pub message: String,
}

impl ClassificationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A summarizer call that did not produce text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Error summarizing text: {message}")]
pub struct SummarizationError {
    pub message: String,
}

impl SummarizationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
