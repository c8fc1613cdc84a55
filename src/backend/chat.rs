use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::backend::TranslationBackend;
use crate::errors::BackendError;

/// Client for OpenAI-compatible chat-completions endpoints
#[derive(Debug)]
pub struct ChatBackend {
    /// Base URL of the API, without the `/chat/completions` suffix
    base_url: String,
    /// API key, sent as a bearer token when non-empty
    api_key: String,
    /// Model name to request
    model: String,
    /// Per-call timeout in seconds
    timeout_secs: u64,
    /// HTTP client for making requests
    client: Client,
}

/// Chat message object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user or assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatRequest {
    /// Model name to use for generation
    model: String,
    /// Messages of the conversation
    messages: Vec<ChatMessage>,
    /// Sampling temperature; translation wants determinism
    temperature: f32,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    /// Generated choices
    choices: Vec<ChatChoice>,
}

/// A single response choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    /// Response message
    message: ChatMessage,
}

impl ChatBackend {
    /// Create a new client for an OpenAI-compatible endpoint.
    ///
    /// The endpoint must be a valid absolute URL; `/chat/completions` is
    /// appended per request. Uses connection pooling for better performance
    /// with concurrent requests.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, BackendError> {
        let endpoint = endpoint.into();

        Url::parse(&endpoint).map_err(|e| {
            BackendError::RequestFailed(format!("Invalid backend endpoint '{}': {}", endpoint, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(20)
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(|e| BackendError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            timeout_secs,
            client,
        })
    }

    /// Full URL of the chat-completions route
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl TranslationBackend for ChatBackend {
    async fn complete(
        &self,
        system_prompt: &str,
        user_payload: &str,
    ) -> Result<String, BackendError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_payload.to_string(),
                },
            ],
            temperature: 0.0,
        };

        let mut builder = self.client.post(self.completions_url()).json(&request);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(self.timeout_secs)
            } else {
                BackendError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Chat API error ({}): {}", status, message);
            return Err(BackendError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| BackendError::RequestFailed(format!("Failed to read response body: {}", e)))?;

        let parsed: ChatResponse = serde_json::from_str(&response_text).map_err(|e| {
            // Log a bounded slice of the raw body for diagnosis
            error!(
                "Failed to parse chat API response: {}. Raw response (first 500 chars): {}",
                e,
                response_text.chars().take(500).collect::<String>()
            );
            BackendError::ParseError(e.to_string())
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(BackendError::EmptyResponse)?;

        Ok(content)
    }

    fn name(&self) -> &str {
        "chat"
    }
}
