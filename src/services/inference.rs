use crate::config::InferenceSettings;
use crate::core::prompt;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling the inference API
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("model returned no content")]
    EmptyResponse,

    #[error("invalid response format: {0}")]
    InvalidResponse(String),
}

/// One chat completion over a pair of photo URLs
///
/// Implementations return the raw assistant message text; interpreting that
/// text as a compatibility verdict is the caller's job.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Run a single non-streaming completion and return the assistant text
    async fn score_pair(
        &self,
        subject_url: &str,
        candidate_url: &str,
    ) -> Result<String, InferenceError>;
}

/// OpenAI chat completions client
///
/// Handles the one call this service makes: a vision completion carrying the
/// fixed compatibility prompt and two signed image URLs. The base URL is
/// injectable so tests can point the client at a local mock server.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl OpenAiClient {
    /// Create a new inference client
    pub fn new(base_url: String, api_key: String, model: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            model,
            client,
        }
    }

    pub fn from_settings(settings: &InferenceSettings) -> Self {
        Self::new(
            settings.base_url.clone(),
            settings.api_key.clone(),
            settings.model.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }
}

#[async_trait]
impl InferenceClient for OpenAiClient {
    async fn score_pair(
        &self,
        subject_url: &str,
        candidate_url: &str,
    ) -> Result<String, InferenceError> {
        let url = format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        let payload = prompt::completion_request(&self.model, subject_url, candidate_url);

        tracing::debug!("Requesting completion from {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Completion request failed: {} - {}", status, body);
            return Err(InferenceError::ApiError(format!(
                "Completion request failed: {}",
                status
            )));
        }

        let json: Value = response.json().await?;

        let message = json
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|choice| choice.get("message"))
            .ok_or_else(|| InferenceError::InvalidResponse("Missing choices array".into()))?;

        // Null or empty content is the "model said nothing" case, kept
        // distinct from a structurally broken response
        let content = message
            .get("content")
            .and_then(|c| c.as_str())
            .unwrap_or("");

        if content.is_empty() {
            return Err(InferenceError::EmptyResponse);
        }

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OpenAiClient::new(
            "https://api.openai.test/v1".to_string(),
            "test_key".to_string(),
            "gpt-4o-mini".to_string(),
            Duration::from_secs(30),
        );

        assert_eq!(client.base_url, "https://api.openai.test/v1");
        assert_eq!(client.model, "gpt-4o-mini");
    }
}
