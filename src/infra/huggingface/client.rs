use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::fetch::{HttpClient, post_json};
use crate::services::{SentimentClassifier, Summarizer};

/// `https://.../models` + `facebook/bart-large-cnn` → full model URL.
pub fn model_endpoint(base_url: &str, model_id: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), model_id)
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
}

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    inputs: &'a str,
    parameters: SummarizeParameters,
}

#[derive(Serialize)]
struct SummarizeParameters {
    max_length: u32,
    min_length: u32,
    do_sample: bool,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
    Failure { error: String },
}

#[derive(Debug, Deserialize)]
struct SummaryItem {
    summary_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SummarizeResponse {
    Items(Vec<SummaryItem>),
    Failure { error: String },
}

/// Sentiment classifier backed by a text-classification model endpoint.
pub struct HuggingFaceClassifier<C> {
    http: C,
    endpoint: String,
}

impl<C: HttpClient> HuggingFaceClassifier<C> {
    pub fn new(http: C, endpoint: String) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl<C: HttpClient> SentimentClassifier for HuggingFaceClassifier<C> {
    #[tracing::instrument(skip(self, text), fields(chars = text.len()))]
    async fn classify(&self, text: &str) -> Result<String> {
        let bytes = post_json(&self.http, &self.endpoint, &ClassifyRequest { inputs: text }).await?;
        parse_label(&bytes)
    }
}

/// Picks the highest-scoring label from a classification response.
fn parse_label(bytes: &[u8]) -> Result<String> {
    let response: ClassifyResponse = serde_json::from_slice(bytes)
        .map_err(|e| anyhow!("Failed to parse classification response: {}", e))?;

    let scores = match response {
        ClassifyResponse::Nested(outer) => outer.into_iter().next().unwrap_or_default(),
        ClassifyResponse::Flat(scores) => scores,
        ClassifyResponse::Failure { error } => return Err(anyhow!("Classifier error: {}", error)),
    };

    scores
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map(|s| s.label)
        .ok_or_else(|| anyhow!("Classification response contained no labels"))
}

/// Summarizer backed by a summarization model endpoint.
pub struct HuggingFaceSummarizer<C> {
    http: C,
    endpoint: String,
}

impl<C: HttpClient> HuggingFaceSummarizer<C> {
    pub fn new(http: C, endpoint: String) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl<C: HttpClient> Summarizer for HuggingFaceSummarizer<C> {
    #[tracing::instrument(skip(self, text), fields(chars = text.len()))]
    async fn summarize(&self, text: &str, max_length: u32, min_length: u32) -> Result<String> {
        let request = SummarizeRequest {
            inputs: text,
            parameters: SummarizeParameters {
                max_length,
                min_length,
                do_sample: false,
            },
        };
        let bytes = post_json(&self.http, &self.endpoint, &request).await?;
        parse_summary(&bytes)
    }
}

fn parse_summary(bytes: &[u8]) -> Result<String> {
    let response: SummarizeResponse = serde_json::from_slice(bytes)
        .map_err(|e| anyhow!("Failed to parse summarization response: {}", e))?;

    match response {
        SummarizeResponse::Items(items) => items
            .into_iter()
            .next()
            .map(|i| i.summary_text)
            .ok_or_else(|| anyhow!("Summarization response was empty")),
        SummarizeResponse::Failure { error } => Err(anyhow!("Summarizer error: {}", error)),
    }
}
