//! LLM Client: the single point of entry for all chat-completion calls in tomatoTool.
//!
//! ARCHITECTURAL RULE: No other module may call the provider API directly.
//! All LLM interactions MUST go through the `ChatCompletion` trait defined here.
//!
//! Calls are single-attempt and fail fast. Retrying is left to the user.
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::conversation::Role;

pub mod json;
pub mod prompts;
#[cfg(test)]
pub mod testing;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx from the provider. `body` is the provider's raw error text.
    #[error("Provider error (status {status}): {body}")]
    Provider { status: u16, body: String },

    #[error("LLM returned empty content")]
    EmptyResponse,

    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),
}

/// One chat turn on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A provider-agnostic completion request. `model: None` uses the configured default.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: Option<String>,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    /// System instruction followed by a single user prompt.
    pub fn prompt(system: &str, prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            model: None,
            temperature,
            messages: vec![
                ChatMessage::new(Role::System, system),
                ChatMessage::new(Role::User, prompt),
            ],
        }
    }
}

/// The completion seam. `LlmClient` talks to OpenRouter; tests swap in a fake.
///
/// Carried in `AppState` as `Arc<dyn ChatCompletion>`.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Returns the text content of the first choice. Blank content is `EmptyResponse`.
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

/// Calls the model and parses a JSON object out of its free-form reply.
pub async fn complete_json<T: DeserializeOwned>(
    llm: &dyn ChatCompletion,
    request: CompletionRequest,
) -> Result<T, LlmError> {
    let text = llm.complete(request).await?;
    json::extract_json(&text)
}

#[derive(Debug, Serialize)]
struct OpenRouterRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct OpenRouterResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl OpenRouterResponse {
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
    }
}

/// OpenRouter-compatible chat-completion client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
    default_model: String,
    app_url: Option<String>,
    app_title: Option<String>,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(config.llm_timeout_secs))
                .build()?,
            api_key: config.openrouter_api_key.clone(),
            endpoint: format!("{}/chat/completions", config.openrouter_base_url),
            default_model: config.openrouter_model.clone(),
            app_url: config.app_url.clone(),
            app_title: config.app_title.clone(),
        })
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }
}

#[async_trait]
impl ChatCompletion for LlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let model = request.model.as_deref().unwrap_or(&self.default_model);
        let body = OpenRouterRequest {
            model,
            temperature: request.temperature,
            messages: &request.messages,
        };

        let mut builder = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body);
        if let Some(url) = &self.app_url {
            builder = builder.header("HTTP-Referer", url);
        }
        if let Some(title) = &self.app_title {
            builder = builder.header("X-Title", title);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM provider returned {}: {}", status, body);
            return Err(LlmError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OpenRouterResponse = response.json().await?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "LLM call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
                model, usage.prompt_tokens, usage.completion_tokens
            );
        }

        parsed.into_text().ok_or(LlmError::EmptyResponse)
    }
}
