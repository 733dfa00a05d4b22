//! One user turn: record it, answer it, count it.

use parley_common::InvalidUsageError;
use tracing::debug;

use crate::client::ChatClient;
use crate::session::ConversationSession;

/// What a completed exchange produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeOutcome {
    /// Text recorded as the assistant turn.
    pub reply: String,
    /// Usage added to the session total for this exchange.
    pub usage_added: u64,
    /// Whether the assistant turn is the apology for a failed call.
    pub failed: bool,
}

/// Run one exchange for `text`.
///
/// Blank input changes nothing and returns `Ok(None)` without calling the
/// backend. Otherwise the user turn and exactly one assistant turn are
/// appended and the exchange's usage is added once.
pub async fn run_exchange(
    session: &mut ConversationSession,
    client: &mut ChatClient,
    text: &str,
) -> Result<Option<ExchangeOutcome>, InvalidUsageError> {
    if !session.record_user_message(text) {
        return Ok(None);
    }

    let reply = client.reply(text).await;
    session.record_assistant_reply(reply.text.clone());

    let usage = session.usage_for_exchange(text, &reply.text, reply.usage.as_ref());
    session.accumulate_usage(i64::try_from(usage).unwrap_or(i64::MAX))?;

    debug!(
        session = %session.id().short(),
        failed = reply.failed,
        usage,
        "exchange complete"
    );

    Ok(Some(ExchangeOutcome {
        reply: reply.text,
        usage_added: usage,
        failed: reply.failed,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use parley_common::UserCredential;

    use super::*;
    use crate::client::{ChatSettings, DEFAULT_APOLOGY};
    use crate::{AiClient, AiResponse, BackendError, Message, TokenUsage};

    struct FixedBackend(Result<(&'static str, Option<TokenUsage>), &'static str>);

    #[async_trait]
    impl AiClient for FixedBackend {
        async fn send_message(&self, _messages: &[Message]) -> Result<AiResponse, BackendError> {
            match &self.0 {
                Ok((content, usage)) => Ok(AiResponse {
                    content: content.to_string(),
                    usage: *usage,
                }),
                Err(detail) => Err(BackendError::NetworkError(detail.to_string())),
            }
        }
    }

    fn client(backend: FixedBackend) -> ChatClient {
        let credential = UserCredential::new("ana", "abc123").unwrap();
        ChatClient::initialize_with_backend(
            Some(&credential),
            ChatSettings::default(),
            Arc::new(backend),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn exchange_records_both_turns_and_counts_once() {
        let mut session = ConversationSession::new();
        let mut client = client(FixedBackend(Ok(("Olá!", None))));

        let outcome = run_exchange(&mut session, &mut client, "Oi")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(outcome.reply, "Olá!");
        assert_eq!(outcome.usage_added, 2);
        assert!(!outcome.failed);
        assert_eq!(
            session.transcript(),
            [Message::user("Oi"), Message::assistant("Olá!")]
        );
        assert_eq!(session.usage_total(), 2);
    }

    #[tokio::test]
    async fn blank_input_skips_the_backend() {
        let mut session = ConversationSession::new();
        let mut client = client(FixedBackend(Ok(("unused", None))));

        let outcome = run_exchange(&mut session, &mut client, "   ").await.unwrap();

        assert!(outcome.is_none());
        assert!(session.is_empty());
        assert_eq!(session.usage_total(), 0);
        assert_eq!(client.history_len(), 0);
    }

    #[tokio::test]
    async fn failed_call_still_fills_the_assistant_slot() {
        let mut session = ConversationSession::new();
        let mut client = client(FixedBackend(Err("connection refused")));

        let outcome = run_exchange(&mut session, &mut client, "hello world")
            .await
            .unwrap()
            .unwrap();

        assert!(outcome.failed);
        assert_eq!(session.len() % 2, 0);
        assert_eq!(session.transcript()[1], Message::assistant(DEFAULT_APOLOGY));
        let expected = 2 + DEFAULT_APOLOGY.split_whitespace().count() as u64;
        assert_eq!(session.usage_total(), expected);
    }

    #[tokio::test]
    async fn reported_usage_is_preferred() {
        let mut session = ConversationSession::new();
        let usage = TokenUsage::new(7, 5, Some(12));
        let mut client = client(FixedBackend(Ok(("Olá!", Some(usage)))));

        run_exchange(&mut session, &mut client, "Oi").await.unwrap();
        run_exchange(&mut session, &mut client, "Oi de novo").await.unwrap();

        assert_eq!(session.usage_total(), 24);
        assert_eq!(session.len(), 4);
    }
}
