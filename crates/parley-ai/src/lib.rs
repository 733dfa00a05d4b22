//! Chat engine for parley.
//!
//! Provides:
//! - the `AiClient` backend seam and a Gemini implementation
//! - `ConversationSession`, the append-only transcript with a usage counter
//! - `ChatClient`, which turns one user message into one reply and never
//!   lets a backend failure escape
//! - `run_exchange`, the single place a user turn is recorded, answered and
//!   counted

pub mod client;
pub mod exchange;
pub mod gemini;
pub mod session;
pub mod usage;

use async_trait::async_trait;

pub use client::{ChatClient, ChatMode, ChatSettings, Reply};
pub use exchange::{run_exchange, ExchangeOutcome};
pub use gemini::{GeminiClient, GeminiConfig};
pub use session::ConversationSession;
pub use usage::{UsageEstimator, WordCountEstimator};

/// A hosted text-generation backend.
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Generate the next assistant turn for `messages`, oldest first.
    async fn send_message(&self, messages: &[Message]) -> Result<AiResponse, BackendError>;
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub speaker: Speaker,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct AiResponse {
    pub content: String,
    /// Present only when the backend reported token counts.
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    /// Build from backend counts; a missing total is input + output.
    pub fn new(input_tokens: u64, output_tokens: u64, total_tokens: Option<u64>) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: total_tokens
                .unwrap_or_else(|| input_tokens.saturating_add(output_tokens)),
        }
    }
}

/// A failed backend call.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
    #[error("Empty reply")]
    EmptyReply,
}
