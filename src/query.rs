//! Free-text query parsing: `"alice@corp.com 2024"` → subject + year.

use serde::Serialize;
use std::fmt;

/// Who to analyze and, optionally, which calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    subject_filter: String,
    year_filter: Option<i32>,
}

impl Query {
    /// Splits `input` on whitespace. The first token of exactly four ASCII
    /// digits becomes the year; every other token, in order, forms the subject.
    pub fn parse(input: &str) -> Self {
        let mut year_filter = None;
        let mut subject_tokens = Vec::new();

        for token in input.split_whitespace() {
            if year_filter.is_none() && is_year_token(token) {
                year_filter = token.parse().ok();
            } else {
                subject_tokens.push(token);
            }
        }

        Self {
            subject_filter: subject_tokens.join(" "),
            year_filter,
        }
    }

    pub fn subject_filter(&self) -> &str {
        &self.subject_filter
    }

    pub fn year_filter(&self) -> Option<i32> {
        self.year_filter
    }
}

fn is_year_token(token: &str) -> bool {
    token.len() == 4 && token.bytes().all(|b| b.is_ascii_digit())
}

/// `alice (2024)` or `alice (All Years)`.
impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year_filter {
            Some(year) => write!(f, "{} ({})", self.subject_filter, year),
            None => write!(f, "{} (All Years)", self.subject_filter),
        }
    }
}
