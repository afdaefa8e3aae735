use crate::fetch::client::HttpClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};

/// An [`HttpClient`] wrapper that injects an API key as an HTTP header.
///
/// The header is validated once at construction so `execute` never has to
/// deal with a malformed token.
pub struct ApiKey<C> {
    inner: C,
    header_name: HeaderName,
    value: HeaderValue,
}

impl<C> ApiKey<C> {
    /// Sends `Authorization: Bearer <key>`, which is what hosted inference
    /// endpoints expect.
    pub fn bearer(inner: C, key: &str) -> Result<Self> {
        let mut value = HeaderValue::from_str(&format!("Bearer {key}"))
            .context("API token contains characters not allowed in a header")?;
        value.set_sensitive(true);
        Ok(Self {
            inner,
            header_name: AUTHORIZATION,
            value,
        })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut()
            .insert(self.header_name.clone(), self.value.clone());
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::RecordingClient;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_bearer_header_is_injected() {
        let recorder = Arc::new(RecordingClient::ok("[]"));
        let client = ApiKey::bearer(recorder.clone(), "hf_secret").unwrap();

        let req = reqwest::Request::new(
            reqwest::Method::POST,
            "http://localhost/models/x".parse().unwrap(),
        );
        client.execute(req).await.unwrap();

        let seen = recorder.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0].headers.get(AUTHORIZATION).unwrap(),
            "Bearer hf_secret"
        );
    }

    #[test]
    fn test_invalid_token_rejected() {
        let recorder = RecordingClient::ok("[]");
        assert!(ApiKey::bearer(recorder, "bad\ntoken").is_err());
    }
}
