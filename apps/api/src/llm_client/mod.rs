//! LLM client — the single point of entry for completion-service calls.
//!
//! ARCHITECTURAL RULE: no other module may call the completion API directly.
//! The pipeline depends on the `CompletionClient` trait, so tests (and future
//! providers) can substitute an implementation without touching the callers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// The only response format this service ever requests.
pub const RESPONSE_FORMAT_JSON: &str = "json_object";

/// A fully-specified completion request: system/user message pair plus
/// sampling parameters. Built by `analysis::prompts`, consumed here.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPayload {
    pub system_message: String,
    pub user_message: String,
    /// Always `json_object` — the model is forced to emit a JSON object.
    pub response_format: &'static str,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Error)]
pub enum ModelError {
    /// Network failure, timeout, auth rejection, or any non-2xx status.
    #[error("completion service unavailable: {0}")]
    Unavailable(String),

    /// The service answered but produced no content.
    #[error("completion service returned no content")]
    EmptyResponse,
}

/// Injected capability for calling an external completion service.
///
/// Exactly one outbound call per `complete` invocation — no retry policy at
/// this layer. Callers wanting resilience must wrap it themselves.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, payload: &PromptPayload) -> Result<String, ModelError>;
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI chat-completions implementation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat<'a>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// `CompletionClient` backed by the OpenAI chat-completions API.
///
/// Created once at startup and shared across requests; holds no per-request
/// state beyond the reqwest connection pool.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: String, model: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, payload: &PromptPayload) -> Result<String, ModelError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &payload.system_message,
                },
                ChatMessage {
                    role: "user",
                    content: &payload.user_message,
                },
            ],
            response_format: ResponseFormat {
                format_type: payload.response_format,
            },
            temperature: payload.temperature,
            max_tokens: payload.max_output_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Unavailable(format!("HTTP {status}: {body}")));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Unavailable(format!("malformed completion response: {e}")))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(ModelError::EmptyResponse)?;

        debug!(
            "completion call succeeded: model={}, output_chars={}",
            self.model,
            content.len()
        );

        Ok(content)
    }
}
