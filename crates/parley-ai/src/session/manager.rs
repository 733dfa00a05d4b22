//! Session struct, transcript recording and usage bookkeeping.

use parley_common::{InvalidUsageError, SessionId};
use tracing::debug;

use crate::usage::{UsageEstimator, WordCountEstimator};
use crate::{Message, TokenUsage};

/// The transcript and usage counter of one chat.
///
/// Created by the caller at chat start and dropped when the chat ends.
/// History is append-only.
pub struct ConversationSession {
    /// Identifier used in log lines.
    id: SessionId,
    /// Transcript, oldest first.
    history: Vec<Message>,
    /// Usage accumulated over all exchanges.
    usage_total: u64,
    /// Fallback when the backend reports no usage.
    estimator: Box<dyn UsageEstimator>,
    /// Whether backend-reported usage wins over the estimate.
    prefer_reported: bool,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            history: Vec::new(),
            usage_total: 0,
            estimator: Box::new(WordCountEstimator),
            prefer_reported: true,
        }
    }

    pub fn with_estimator(mut self, estimator: Box<dyn UsageEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_prefer_reported(mut self, prefer_reported: bool) -> Self {
        self.prefer_reported = prefer_reported;
        self
    }

    /// Append a user turn. Blank input is ignored and returns `false`.
    pub fn record_user_message(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text.trim().is_empty() {
            return false;
        }
        self.history.push(Message::user(text));
        true
    }

    /// Append an assistant turn; failed calls record their apology here.
    pub fn record_assistant_reply(&mut self, text: impl Into<String>) {
        self.history.push(Message::assistant(text));
    }

    /// Estimated usage of one exchange, from the configured estimator.
    pub fn estimate_usage(&self, user_text: &str, assistant_text: &str) -> u64 {
        self.estimator.estimate(user_text, assistant_text)
    }

    /// Usage to count for one exchange.
    ///
    /// Backend-reported totals win when present and preferred; otherwise the
    /// estimator decides.
    pub fn usage_for_exchange(
        &self,
        user_text: &str,
        assistant_text: &str,
        reported: Option<&TokenUsage>,
    ) -> u64 {
        match reported {
            Some(usage) if self.prefer_reported => usage.total_tokens,
            _ => self.estimate_usage(user_text, assistant_text),
        }
    }

    /// Add `amount` to the running total. Negative amounts are rejected and
    /// leave the total untouched.
    pub fn accumulate_usage(&mut self, amount: i64) -> Result<(), InvalidUsageError> {
        let amount = u64::try_from(amount).map_err(|_| InvalidUsageError { amount })?;
        self.usage_total = self.usage_total.saturating_add(amount);
        debug!(session = %self.id.short(), amount, total = self.usage_total, "usage accumulated");
        Ok(())
    }

    pub fn usage_total(&self) -> u64 {
        self.usage_total
    }

    /// Read-only view of the transcript, oldest first.
    pub fn transcript(&self) -> &[Message] {
        &self.history
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Number of messages in history.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}
