// ABOUTME: OpenRouter API client wrapping the OpenAI-compatible chat API.
// ABOUTME: Supports custom HTTP-Referer and X-Title headers for app identification.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};

use super::openai::{OpenAIError, OpenAIRequest, OpenAIResponse};
use super::{Request, Response};
use crate::error::LlmError;

/// Base URL for OpenRouter's OpenAI-compatible API.
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model when none is specified.
pub const OPENROUTER_DEFAULT_MODEL: &str = "anthropic/claude-sonnet-4";

/// Default per-request timeout.
pub const OPENROUTER_DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for OpenRouter API.
/// OpenRouter provides a unified API that routes to various LLM providers.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
    default_model: String,
    timeout: Duration,
}

impl OpenRouterClient {
    /// Create a new OpenRouter client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_headers(api_key, None, None)
    }

    /// Create a new OpenRouter client from the OPENROUTER_API_KEY environment variable.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var("OPENROUTER_API_KEY").map_err(|_| {
            LlmError::Configuration("OPENROUTER_API_KEY environment variable not set".to_string())
        })?;
        Ok(Self::new(api_key))
    }

    /// Create a new OpenRouter client with custom headers for app identification.
    ///
    /// # Arguments
    /// * `api_key` - OpenRouter API key
    /// * `referer` - HTTP-Referer header (your app's URL)
    /// * `title` - X-Title header (your app's name, shown in the OpenRouter dashboard)
    pub fn with_headers(
        api_key: impl Into<String>,
        referer: Option<&str>,
        title: Option<&str>,
    ) -> Self {
        let mut headers = HeaderMap::new();

        if let Some(referer) = referer {
            if let Ok(value) = HeaderValue::from_str(referer) {
                headers.insert("HTTP-Referer", value);
            }
        }

        if let Some(title) = title {
            if let Ok(value) = HeaderValue::from_str(title) {
                headers.insert("X-Title", value);
            }
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            api_key: api_key.into(),
            http,
            base_url: OPENROUTER_BASE_URL.to_string(),
            default_model: OPENROUTER_DEFAULT_MODEL.to_string(),
            timeout: OPENROUTER_DEFAULT_TIMEOUT,
        }
    }

    /// Point the client at another OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the default model to use when none is specified in the request.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn map_send_error(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Http(err)
        }
    }
}

#[async_trait]
impl super::client::LlmClient for OpenRouterClient {
    async fn create_message(&self, req: &Request) -> Result<Response, LlmError> {
        let mut openai_req = OpenAIRequest::from(req);

        // Use default model if none specified
        if openai_req.model.is_empty() {
            openai_req.model = self.default_model.clone();
        }

        tracing::debug!(
            model = %openai_req.model,
            messages = openai_req.messages.len(),
            tools = openai_req.tools.len(),
            "Sending chat completion request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .timeout(self.timeout)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&openai_req)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<OpenAIError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let openai_resp: OpenAIResponse = serde_json::from_str(&body)?;
        Ok(Response::from(openai_resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let client = OpenRouterClient::new("key");
        assert_eq!(client.base_url(), OPENROUTER_BASE_URL);
        assert_eq!(client.default_model(), "anthropic/claude-sonnet-4");
        assert_eq!(client.timeout, OPENROUTER_DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_builder_overrides() {
        let client = OpenRouterClient::with_headers("key", Some("https://example.com"), Some("sqlpilot"))
            .with_base_url("http://localhost:8080/v1/")
            .with_default_model("openai/gpt-4o")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(client.base_url(), "http://localhost:8080/v1");
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(client.default_model(), "openai/gpt-4o");
        assert_eq!(client.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_header_values_are_ignored() {
        let client = OpenRouterClient::with_headers("key", Some("bad\nvalue"), None);
        assert_eq!(client.base_url(), OPENROUTER_BASE_URL);
    }
}
