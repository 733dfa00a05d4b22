//! Create or rotate the stored credential.

use parley_common::UserCredential;
use tracing::{info, warn};

use crate::error::RegistrationError;
use crate::mirror::CredentialMirror;
use crate::sqlite::CredentialStore;

/// Register `name` with `token`.
///
/// An existing row for `name` has its token replaced; otherwise a new row is
/// inserted. Concurrent registrations of one name all succeed and the last
/// writer's token wins. The store write is authoritative. A failed mirror write is
/// logged and does not fail the registration.
pub async fn register(
    store: &dyn CredentialStore,
    mirror: Option<&CredentialMirror>,
    name: &str,
    token: &str,
) -> Result<UserCredential, RegistrationError> {
    let credential = UserCredential::new(name, token)?;

    // `rotated` feeds the log line only; `upsert` is the write.
    let rotated = store.exists(Some(credential.name())).await?;
    store.upsert(&credential).await?;

    if let Some(mirror) = mirror {
        if let Err(e) = mirror.write(&credential) {
            warn!(path = %mirror.path().display(), "failed to write credential mirror: {}", e);
        }
    }

    info!(name = %credential.name(), rotated, "credential registered");
    Ok(credential)
}

#[cfg(test)]
mod tests {
    use parley_common::ValidationError;
    use tempfile::TempDir;

    use super::*;
    use crate::sqlite::SqliteCredentialStore;

    async fn store_in(dir: &TempDir) -> SqliteCredentialStore {
        let store = SqliteCredentialStore::new(dir.path().join("credentials.db"));
        store.init().await.unwrap();
        store
    }

    #[tokio::test]
    async fn first_registration_inserts_and_mirrors() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        let mirror = CredentialMirror::new(dir.path().join("credentials.env"));

        let cred = register(&store, Some(&mirror), "ana", "abc123").await.unwrap();

        assert_eq!(cred.name(), "ana");
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(mirror.read().unwrap(), Some(cred));
    }

    #[tokio::test]
    async fn reregistering_rotates_token_in_place() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        let mirror = CredentialMirror::new(dir.path().join("credentials.env"));

        register(&store, Some(&mirror), "ana", "abc123").await.unwrap();
        register(&store, Some(&mirror), "ana", "def456").await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.exists(Some("ana")).await.unwrap());
        assert_eq!(store.select_first().await.unwrap().unwrap().token(), "def456");
        assert_eq!(mirror.read().unwrap().unwrap().token(), "def456");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registrations_of_one_name_all_succeed() {
        let dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(store_in(&dir).await);

        for round in 0..5 {
            let tasks: Vec<_> = (0..8)
                .map(|i| {
                    let store = store.clone();
                    tokio::spawn(async move {
                        register(store.as_ref(), None, "ana", &format!("token-{round}-{i}")).await
                    })
                })
                .collect();

            for task in tasks {
                let result = task.await.expect("registration task panicked");
                assert!(result.is_ok(), "registration failed: {result:?}");
            }
        }

        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.exists(Some("ana")).await.unwrap());
        let token = store.select_first().await.unwrap().unwrap().token().to_string();
        assert!(token.starts_with("token-4-"));
    }

    #[tokio::test]
    async fn inputs_are_trimmed() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;

        let cred = register(&store, None, "  ana ", " abc123\n").await.unwrap();

        assert_eq!(cred.name(), "ana");
        assert_eq!(cred.token(), "abc123");
        assert!(store.exists(Some("ana")).await.unwrap());
    }

    #[tokio::test]
    async fn blank_token_is_rejected_without_writing() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        let mirror = CredentialMirror::new(dir.path().join("credentials.env"));

        let err = register(&store, Some(&mirror), "ana", "   ").await.unwrap_err();

        assert!(matches!(
            err,
            RegistrationError::Validation(ValidationError::EmptyToken)
        ));
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(!mirror.path().exists());
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;

        let err = register(&store, None, "", "abc123").await.unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Validation(ValidationError::EmptyName)
        ));
    }

    #[tokio::test]
    async fn mirror_failure_does_not_fail_registration() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        // A directory where the mirror file should go makes the write fail.
        let blocked = dir.path().join("blocked");
        std::fs::create_dir_all(blocked.join("credentials.env")).unwrap();
        let mirror = CredentialMirror::new(blocked.join("credentials.env"));

        let cred = register(&store, Some(&mirror), "ana", "abc123").await.unwrap();

        assert_eq!(store.select_first().await.unwrap(), Some(cred));
    }
}
