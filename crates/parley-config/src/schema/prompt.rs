//! Prompt shaping and user-facing reply text.

use serde::{Deserialize, Serialize};

pub use parley_common::DEFAULT_APOLOGY;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Prepended to every outbound message; empty disables it.
    pub instruction: String,
    pub apology: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            instruction: String::new(),
            apology: DEFAULT_APOLOGY.into(),
        }
    }
}

impl PromptConfig {
    /// The instruction, if one is configured.
    pub fn instruction(&self) -> Option<&str> {
        let trimmed = self.instruction.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}
