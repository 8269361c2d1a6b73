//! OpenAI-compatible chat completions summarizer

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use clap::Parser;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::domain::summaries::{Summarizer, SummarizerError, MISSING_CREDENTIAL_SUMMARY};

/// LLM configuration
#[derive(Clone, Debug, Parser)]
pub struct LlmConfig {
    /// API key; without one, summaries are replaced by a notice
    #[arg(long, env = "LLM_API_KEY")]
    pub llm_api_key: Option<String>,

    /// Chat completions endpoint
    #[arg(
        long,
        env = "LLM_API_URL",
        default_value = "https://api.openai.com/v1/chat/completions"
    )]
    pub llm_api_url: String,

    /// Model name
    #[arg(long, env = "LLM_MODEL", default_value = "gpt-4o-mini")]
    pub llm_model: String,

    /// Request timeout in seconds
    #[arg(long, env = "LLM_TIMEOUT_SECS", default_value = "30")]
    pub llm_timeout_secs: u64,

    /// Upper bound on generated tokens
    #[arg(long, env = "LLM_MAX_TOKENS", default_value = "200")]
    pub llm_max_tokens: u32,

    /// Sampling temperature
    #[arg(long, env = "LLM_TEMPERATURE", default_value = "0.3")]
    pub llm_temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Summarizer backed by an OpenAI-compatible chat completions API
#[derive(Debug, Clone)]
pub struct OpenAiSummarizer {
    client: Client,
    api_key: Option<String>,
    url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiSummarizer {
    /// Creates a summarizer from `config`.
    pub fn new(config: &LlmConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()
            .context("failed to build the LLM HTTP client")?;

        let api_key = config
            .llm_api_key
            .clone()
            .filter(|key| !key.trim().is_empty());

        if api_key.is_none() {
            warn!("LLM_API_KEY is not set, conversation summaries are disabled");
        }

        Ok(Self {
            client,
            api_key,
            url: config.llm_api_url.clone(),
            model: config.llm_model.clone(),
            max_tokens: config.llm_max_tokens,
            temperature: config.llm_temperature,
        })
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, SummarizerError> {
        let Some(api_key) = &self.api_key else {
            warn!("no LLM credential, using the placeholder summary");

            return Ok(MISSING_CREDENTIAL_SUMMARY.to_string());
        };

        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .context("failed to reach the LLM provider")?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %body, "LLM provider returned an error");

            return Err(SummarizerError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let completion = response
            .json::<ChatResponse>()
            .await
            .context("unexpected LLM response")?;

        let summary = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(SummarizerError::EmptyResponse)?;

        debug!(model = %self.model, "conversation summarised");

        Ok(summary)
    }
}
