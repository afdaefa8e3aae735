//! HTTP plumbing for the inference collaborators.

pub mod auth;
mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Result, anyhow};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::Serialize;
use tracing::debug;

/// POSTs `body` as JSON to `url` and returns the raw response body.
///
/// Non-2xx statuses become errors carrying the status and response text.
pub async fn post_json<C: HttpClient + ?Sized, T: Serialize + ?Sized>(
    client: &C,
    url: &str,
    body: &T,
) -> Result<Vec<u8>> {
    let mut req = reqwest::Request::new(reqwest::Method::POST, url.parse()?);
    req.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *req.body_mut() = Some(serde_json::to_vec(body)?.into());

    let resp = client
        .execute(req)
        .await
        .map_err(|e| anyhow!("Failed to send request: {}", e))?;

    let status = resp.status();
    debug!(url, status = status.as_u16(), "Inference response received");

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow!("API returned status {}: {}", status, body));
    }

    Ok(resp.bytes().await?.to_vec())
}
