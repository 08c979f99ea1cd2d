// src/completion/client.rs
//! Text-completion API client (OpenAI-compatible `/completions`).

use crate::config::CompletionSettings;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Prompt in, text of the first candidate out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Credentials and endpoint for one run.
#[derive(Clone)]
pub struct CompletionConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl CompletionConfig {
    pub fn new(api_key: String, settings: &CompletionSettings) -> Self {
        Self {
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            timeout_seconds: settings.timeout_seconds,
        }
    }

    /// Read `OPENAI_API_KEY` (required) and `OPENAI_BASE_URL` (optional
    /// override of the configured endpoint).
    pub fn from_env(settings: &CompletionSettings) -> Result<Self, ConfigError> {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key, settings);
        if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        Ok(config)
    }
}

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    n: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

pub struct OpenAiCompletionClient {
    client: Client,
    config: CompletionConfig,
}

impl OpenAiCompletionClient {
    pub fn new(config: CompletionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = CompletionBody {
            model: &self.config.model,
            prompt: &request.prompt,
            max_tokens: request.max_tokens,
            n: 1,
            temperature: request.temperature,
        };

        info!(
            "Requesting completion from {} (model {}, max_tokens {})",
            self.config.base_url, self.config.model, request.max_tokens
        );

        let response = self
            .client
            .post(format!("{}/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to completion API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Completion API error {}: {}", status, error_text);
            anyhow::bail!("Completion API returned error {}: {}", status, error_text);
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .context("Failed to parse completion API response")?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .context("Completion API returned no choices")
    }
}
