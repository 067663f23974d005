//! Groq Completion Client
//!
//! Wraps Groq's /v1/chat/completions endpoint (OpenAI-compatible).
//! The agent loop sends the entire transcript on every call and gets
//! back a single assistant message; no streaming, no tool calls.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::types::{ChatMessage, CompletionClient, CompletionResponse, TokenUsage};

/// Completion client for OpenAI-compatible chat completions via Groq.
pub struct GroqClient {
    api_url: String,
    api_key: String,
    model: String,
    http: Client,
}

impl GroqClient {
    /// Create a new completion client.
    ///
    /// * `api_url` - Base URL for the API (e.g. `https://api.groq.com/openai`).
    /// * `api_key` - Bearer token for the Authorization header.
    /// * `model` - Model identifier sent with every request.
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            api_url,
            api_key,
            model,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<CompletionResponse> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
        });

        let url = format!("{}/v1/chat/completions", self.api_url);
        let resp = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .context("Completion request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Completion error: {}: {}", status.as_u16(), text);
        }

        let data: Value = resp
            .json()
            .await
            .context("Failed to parse completion response")?;

        let choice = data["choices"]
            .get(0)
            .ok_or_else(|| anyhow::anyhow!("No completion choice returned from the model"))?;

        let content = choice["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Completion choice has no text content"))?
            .to_string();

        let usage = TokenUsage {
            prompt_tokens: data["usage"]["prompt_tokens"].as_u64().unwrap_or(0),
            completion_tokens: data["usage"]["completion_tokens"].as_u64().unwrap_or(0),
            total_tokens: data["usage"]["total_tokens"].as_u64().unwrap_or(0),
        };

        debug!(
            model = %self.model,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "completion returned"
        );

        Ok(CompletionResponse {
            content,
            model: data["model"].as_str().unwrap_or(&self.model).to_string(),
            usage,
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
