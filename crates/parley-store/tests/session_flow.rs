//! Register, resolve, and hold one conversation against a stub backend.

use std::sync::Arc;

use async_trait::async_trait;
use parley_ai::{
    run_exchange, AiClient, AiResponse, BackendError, ChatClient, ChatSettings,
    ConversationSession, Message, Speaker,
};
use parley_store::{register, resolve_credential, CredentialMirror, CredentialStore, SqliteCredentialStore};
use tempfile::TempDir;

struct Greeter;

#[async_trait]
impl AiClient for Greeter {
    async fn send_message(&self, _messages: &[Message]) -> Result<AiResponse, BackendError> {
        Ok(AiResponse {
            content: "Olá!".to_string(),
            usage: None,
        })
    }
}

fn no_env(_key: &str) -> Option<String> {
    None
}

#[tokio::test]
async fn registered_user_holds_a_conversation() {
    let dir = TempDir::new().unwrap();
    let store = SqliteCredentialStore::new(dir.path().join("credentials.db"));
    store.init().await.unwrap();
    let mirror = CredentialMirror::new(dir.path().join("credentials.env"));

    register(&store, Some(&mirror), "ana", "abc123").await.unwrap();

    let credential = resolve_credential(&store, Some(&mirror), no_env)
        .await
        .expect("credential resolves after registration");
    assert_eq!(credential.name(), "ana");
    assert_eq!(credential.token(), "abc123");

    let mut client = ChatClient::initialize_with_backend(
        Some(&credential),
        ChatSettings::default(),
        Arc::new(Greeter),
    )
    .unwrap();
    let mut session = ConversationSession::new();

    let outcome = run_exchange(&mut session, &mut client, "Oi")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome.reply, "Olá!");
    assert!(!outcome.failed);
    let transcript = session.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].speaker, Speaker::User);
    assert_eq!(transcript[0].text, "Oi");
    assert_eq!(transcript[1].speaker, Speaker::Assistant);
    assert_eq!(transcript[1].text, "Olá!");
    assert_eq!(session.usage_total(), 2);
}

#[tokio::test]
async fn reregistration_rotates_the_resolved_token() {
    let dir = TempDir::new().unwrap();
    let store = SqliteCredentialStore::new(dir.path().join("credentials.db"));
    store.init().await.unwrap();

    register(&store, None, "ana", "abc123").await.unwrap();
    register(&store, None, "ana", "def456").await.unwrap();

    assert_eq!(store.count().await.unwrap(), 1);
    assert!(store.exists(Some("ana")).await.unwrap());
    let credential = resolve_credential(&store, None, no_env).await.unwrap();
    assert_eq!(credential.token(), "def456");
}

#[tokio::test]
async fn mirror_alone_is_enough_after_store_loss() {
    let dir = TempDir::new().unwrap();
    let mirror = CredentialMirror::new(dir.path().join("credentials.env"));
    {
        let store = SqliteCredentialStore::new(dir.path().join("first.db"));
        store.init().await.unwrap();
        register(&store, Some(&mirror), "ana", "abc123").await.unwrap();
    }

    let fresh = SqliteCredentialStore::new(dir.path().join("second.db"));
    fresh.init().await.unwrap();
    let credential = resolve_credential(&fresh, Some(&mirror), no_env).await.unwrap();

    assert_eq!(credential.name(), "ana");
    assert_eq!(credential.token(), "abc123");
}
