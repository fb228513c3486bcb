//! Client for an OpenAI-compatible chat-completions endpoint.

use async_trait::async_trait;
use compscout_core::{AppConfig, ChatMessage, Generation, ProviderError, TextGenerator};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::http::{build_client, check_status, normalise_base_url, read_json};

const TEMPERATURE: f32 = 0.2;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Reasoning service backed by `POST {base}/chat/completions`.
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if `base_url` is not an
    /// http(s) URL, or [`ClientError::Http`] if the `reqwest::Client` cannot
    /// be constructed.
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            base_url: normalise_base_url(base_url)?,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
        })
    }

    /// # Errors
    ///
    /// See [`ChatClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.llm_base_url,
            &config.llm_api_key,
            &config.llm_model,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ClientError> {
        let body = CompletionRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
        };
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let completion: CompletionResponse = read_json(check_status(response)?, || {
            format!("chat completion from {}", self.model)
        })
        .await?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or(ClientError::EmptyCompletion)
    }
}

#[async_trait]
impl TextGenerator for ChatClient {
    async fn generate_text(&self, messages: &[ChatMessage]) -> Result<Generation, ProviderError> {
        let content = self.complete(messages).await?;
        tracing::debug!(model = %self.model, chars = content.len(), "chat completion received");
        Ok(Generation { content })
    }
}
