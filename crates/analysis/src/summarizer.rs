//! Summarizer collaborator

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use vigil_errors::{AnalysisError, Error};

/// Text-generation collaborator: takes a prompt, returns analysis text
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce analysis text for a prompt
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unusable response.
    async fn summarize(&self, prompt: &str) -> Result<String, Error>;
}

/// Summarizer configuration
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

/// OpenAI-compatible chat-completions client
pub struct ChatSummarizer {
    client: reqwest::Client,
    config: SummarizerConfig,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl ChatSummarizer {
    /// Create a new chat summarizer
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: SummarizerConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AnalysisError::RequestFailed {
                message: e.to_string(),
            })?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Summarizer for ChatSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, Error> {
        let payload = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        };

        let mut request = self.client.post(&self.config.api_url).json(&payload);
        if !self.config.api_key.is_empty() {
            request = request.bearer_auth(&self.config.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AnalysisError::RequestFailed {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::ApiStatus { status, body }.into());
        }

        let body: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| AnalysisError::ResponseParseFailed {
                    message: e.to_string(),
                })?;

        let Some(choice) = body.choices.first() else {
            return Err(AnalysisError::NoChoiceInResponse.into());
        };

        let content = choice.message.content.trim();
        if content.is_empty() {
            return Err(AnalysisError::EmptyMessage.into());
        }

        Ok(content.to_string())
    }
}
