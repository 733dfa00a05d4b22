//! The soft-failing chat client.

use std::sync::Arc;

use parley_common::{ConfigurationError, UserCredential};
use tracing::{debug, error, warn};

use crate::gemini::GeminiClient;
use crate::{AiClient, BackendError, Message};

use super::types::{ChatHandle, ChatMode, ChatSettings, Reply, DEFAULT_APOLOGY};

/// Sends user messages to a backend, one attempt per call.
pub struct ChatClient {
    backend: Arc<dyn AiClient>,
    settings: ChatSettings,
    /// Present only in stateful mode.
    handle: Option<ChatHandle>,
}

impl ChatClient {
    /// Build a client talking to Gemini with the credential's token.
    ///
    /// Only the presence of a non-blank token is checked here; whether the
    /// backend accepts it shows up on the first call.
    pub fn initialize(
        credential: Option<&UserCredential>,
        settings: ChatSettings,
    ) -> Result<Self, ConfigurationError> {
        let credential = check_credential(credential)?;
        let config = settings.backend.clone().with_api_key(credential.token());
        let backend = GeminiClient::new(config)
            .map_err(|e| ConfigurationError::Backend(e.to_string()))?;
        Ok(Self::build(Arc::new(backend), settings))
    }

    /// Same checks as [`ChatClient::initialize`], with a caller-supplied backend.
    pub fn initialize_with_backend(
        credential: Option<&UserCredential>,
        settings: ChatSettings,
        backend: Arc<dyn AiClient>,
    ) -> Result<Self, ConfigurationError> {
        check_credential(credential)?;
        Ok(Self::build(backend, settings))
    }

    fn build(backend: Arc<dyn AiClient>, mut settings: ChatSettings) -> Self {
        // The apology becomes an assistant turn, which must not be blank.
        if settings.apology.trim().is_empty() {
            warn!("blank apology configured, using the default");
            settings.apology = DEFAULT_APOLOGY.to_string();
        }
        let handle = match settings.mode {
            ChatMode::Stateful => Some(ChatHandle::default()),
            ChatMode::Stateless => None,
        };
        Self {
            backend,
            settings,
            handle,
        }
    }

    /// Send `message` and return the reply text, or the apology on failure.
    pub async fn send(&mut self, message: &str) -> String {
        self.reply(message).await.text
    }

    /// Send `message` and return the reply with any reported usage.
    pub async fn reply(&mut self, message: &str) -> Reply {
        let prompt = self.compose_prompt(message);

        let mut request = self
            .handle
            .as_ref()
            .map(|handle| handle.turns.clone())
            .unwrap_or_default();
        request.push(Message::user(prompt.clone()));

        debug!(mode = ?self.settings.mode, turns = request.len(), "sending message");

        let outcome = self.backend.send_message(&request).await.and_then(|response| {
            let text = response.content.trim().to_string();
            if text.is_empty() {
                Err(BackendError::EmptyReply)
            } else {
                Ok((text, response.usage))
            }
        });

        match outcome {
            Ok((text, usage)) => {
                if let Some(handle) = self.handle.as_mut() {
                    handle.turns.push(Message::user(prompt));
                    handle.turns.push(Message::assistant(text.clone()));
                }
                Reply {
                    text,
                    usage,
                    failed: false,
                }
            }
            Err(err) => {
                self.report_failure(message, &err);
                Reply {
                    text: self.settings.apology.clone(),
                    usage: None,
                    failed: true,
                }
            }
        }
    }

    fn compose_prompt(&self, message: &str) -> String {
        match self.settings.instruction.as_deref().map(str::trim) {
            Some(instruction) if !instruction.is_empty() => format!("{instruction}\n\n{message}"),
            _ => message.to_string(),
        }
    }

    fn report_failure(&self, message: &str, err: &BackendError) {
        error!(
            message = %truncate_chars(message, self.settings.max_logged_chars),
            error = %err,
            "backend call failed"
        );
        if matches!(err, BackendError::Unauthorized(_)) {
            warn!("credential rejected by the backend; register a valid token");
        }
    }

    pub fn mode(&self) -> ChatMode {
        self.settings.mode
    }

    /// Messages held by the stateful handle; always 0 when stateless.
    pub fn history_len(&self) -> usize {
        self.handle.as_ref().map_or(0, |handle| handle.turns.len())
    }
}

fn check_credential(
    credential: Option<&UserCredential>,
) -> Result<&UserCredential, ConfigurationError> {
    let credential = credential.ok_or(ConfigurationError::MissingCredential)?;
    if credential.token().trim().is_empty() {
        return Err(ConfigurationError::EmptyToken);
    }
    Ok(credential)
}

/// Cut `text` to at most `max` characters, marking the cut with an ellipsis.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
