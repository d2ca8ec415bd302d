use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::error::RelayError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Outbound HTTP client for the provider token endpoint
#[derive(Clone, Debug, Default)]
pub struct TokenClient {
    http: reqwest::Client,
}

impl TokenClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// POST a form-encoded body and parse the full response body as JSON
    ///
    /// Exactly one response is awaited. The body is buffered chunk by chunk in
    /// arrival order before parsing. The status code is not checked, so a
    /// provider error document is passed through as long as it is JSON.
    pub async fn post_form(&self, url: &str, body: String) -> Result<Value, RelayError> {
        let mut response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Token endpoint returned non-success status");
        }

        let mut buffer = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            buffer.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&buffer).map_err(|source| RelayError::InvalidJson {
            status: status.as_u16(),
            source,
        })
    }
}
