//! Translate the loaded config into chat engine settings.

use std::time::Duration;

use parley_ai::{ChatMode, ChatSettings, ConversationSession, GeminiConfig};
use parley_config::schema::BackendMode;
use parley_config::ParleyConfig;

pub fn chat_settings(config: &ParleyConfig) -> ChatSettings {
    let backend = GeminiConfig::default()
        .with_model(&config.backend.model)
        .with_base_url(&config.backend.base_url)
        .with_max_tokens(config.backend.max_tokens)
        .with_temperature(config.backend.temperature)
        .with_timeouts(
            Duration::from_secs(u64::from(config.backend.connect_timeout_secs)),
            Duration::from_secs(u64::from(config.backend.request_timeout_secs)),
        );

    ChatSettings {
        mode: chat_mode(config.backend.mode),
        instruction: config.prompt.instruction().map(str::to_string),
        apology: config.prompt.apology.clone(),
        max_logged_chars: config.logging.max_logged_chars as usize,
        backend,
    }
}

pub fn new_session(config: &ParleyConfig) -> ConversationSession {
    ConversationSession::new().with_prefer_reported(config.usage.prefer_reported)
}

fn chat_mode(mode: BackendMode) -> ChatMode {
    match mode {
        BackendMode::Stateful => ChatMode::Stateful,
        BackendMode::Stateless => ChatMode::Stateless,
    }
}
