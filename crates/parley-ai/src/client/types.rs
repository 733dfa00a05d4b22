//! Client settings, modes and reply values.

use crate::gemini::GeminiConfig;
use crate::{Message, TokenUsage};

pub use parley_common::DEFAULT_APOLOGY;

/// Whether the client conditions each call on earlier turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatMode {
    /// The client keeps a handle of earlier successful turns and sends them
    /// with every call.
    #[default]
    Stateful,
    /// Each call carries only the new message.
    Stateless,
}

/// Everything a `ChatClient` needs besides the credential.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub mode: ChatMode,
    /// Prepended to every outbound message.
    pub instruction: Option<String>,
    pub apology: String,
    /// Characters of a failed message kept in the log.
    pub max_logged_chars: usize,
    /// Backend settings; the API key is taken from the credential.
    pub backend: GeminiConfig,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            mode: ChatMode::Stateful,
            instruction: None,
            apology: DEFAULT_APOLOGY.to_string(),
            max_logged_chars: 200,
            backend: GeminiConfig::default(),
        }
    }
}

/// Outcome of one `ChatClient::reply` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// The trimmed reply, or the apology when the call failed.
    pub text: String,
    /// Backend-reported usage, if any.
    pub usage: Option<TokenUsage>,
    pub failed: bool,
}

/// Earlier successful turns held by a stateful client.
#[derive(Debug, Default)]
pub(crate) struct ChatHandle {
    pub(crate) turns: Vec<Message>,
}
