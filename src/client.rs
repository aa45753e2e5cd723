//! Completion Client
//!
//! The agents only see [`CompletionClient`]: an ordered list of role-tagged
//! messages plus a model id goes in, assistant text comes out.
//! [`OpenAiClient`] is the HTTP implementation against any
//! OpenAI-compatible `/chat/completions` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{AgentError, Result};
use crate::message::Message;

/// Opaque request/response call to a language model
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send `messages` to `model` and return the generated text
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String>;
}

/// Connection settings for [`OpenAiClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

/// API request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

/// API response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
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
    prompt_tokens: usize,
    completion_tokens: usize,
}

/// Chat completions client for OpenAI-compatible APIs
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AgentError::Completion(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Check if an API key is configured
    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            AgentError::Completion("OPENAI_API_KEY not set - completions unavailable".to_string())
        })?;

        debug!("Calling chat completions: model={}, messages={}", model, messages.len());

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&ChatRequest { model, messages })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AgentError::Completion(format!("API error {}: {}", status, text)));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Completion(format!("Failed to parse response: {}", e)))?;

        if let Some(usage) = &result.usage {
            info!(
                "Completion: model={}, in={}, out={}",
                model, usage.prompt_tokens, usage.completion_tokens
            );
        }

        let content = result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AgentError::Completion("Response contained no choices".to_string()))?;

        Ok(content.trim().to_string())
    }
}
