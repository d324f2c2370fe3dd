use async_trait::async_trait;

use crate::domain::GenerationError;

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, GenerationError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::failed(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, GenerationError> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::failed(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            // Quota failures are a distinguished, retryable-later kind
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS
                || error_body.contains("RESOURCE_EXHAUSTED")
            {
                return Err(GenerationError::quota_exceeded(format!(
                    "HTTP {}: {}",
                    status, error_body
                )));
            }
            return Err(GenerationError::failed(format!(
                "HTTP {}: {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| GenerationError::failed(format!("Failed to parse response: {}", e)))
    }
}
