//! Shared types for the scout agent.
//!
//! Chat data model plus the client trait seams. The agent loop only sees
//! these traits; concrete Groq/Tavily implementations live in their own
//! modules and are injected at startup.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ─── Chat ────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One turn of conversation. The transcript sent to the completion
/// service is an ordered `Vec<ChatMessage>`, appended-to only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// A single completion from the model.
#[derive(Clone, Debug)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub usage: TokenUsage,
}

// ─── Search ──────────────────────────────────────────────────────

/// One result record from the search service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub content: String,
}

// ─── Client Interfaces ───────────────────────────────────────────

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the full transcript and return the next assistant message.
    /// Synchronous request/response, no streaming.
    async fn complete(&self, messages: &[ChatMessage]) -> anyhow::Result<CompletionResponse>;

    fn model(&self) -> &str;
}

#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run a web search and return the result contents joined with
    /// newline separators.
    async fn search(&self, query: &str) -> anyhow::Result<String>;
}
