//! Hosted model backend configuration types.

use serde::{Deserialize, Serialize};

/// Whether the backend conversation keeps prior turns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum BackendMode {
    /// Every request carries the earlier successful turns of the chat.
    #[default]
    Stateful,
    /// Every request carries only the new message.
    Stateless,
}

/// Gemini backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub model: String,
    pub base_url: String,
    /// Maximum output tokens per reply (valid range: 1-65536).
    pub max_tokens: u32,
    /// Sampling temperature (valid range: 0.0-2.0).
    pub temperature: f64,
    pub mode: BackendMode,
    /// Seconds to wait for a connection (valid range: 1-120).
    pub connect_timeout_secs: u32,
    /// Seconds to wait for a full reply (valid range: 1-600).
    pub request_timeout_secs: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".into(),
            max_tokens: 4096,
            temperature: 0.7,
            mode: BackendMode::Stateful,
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }
}
