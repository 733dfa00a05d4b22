//! Startup credential lookup.

use parley_common::UserCredential;
use tracing::{debug, warn};

use crate::mirror::CredentialMirror;
use crate::sqlite::CredentialStore;

/// Environment key holding the backend token.
pub const ENV_TOKEN_KEY: &str = "GENAI_API_KEY";
/// Environment key holding the user name.
pub const ENV_NAME_KEY: &str = "PARLEY_USER_NAME";

const DEFAULT_ENV_NAME: &str = "default";

/// Find a usable credential, in order: the store's first row, the mirror
/// file, then the environment.
///
/// `env` looks up a variable by key, which keeps tests off the process
/// environment. Failures in one source are logged and the next source is
/// tried. Returns `None` when no source yields a non-blank token.
pub async fn resolve_credential<F>(
    store: &dyn CredentialStore,
    mirror: Option<&CredentialMirror>,
    env: F,
) -> Option<UserCredential>
where
    F: Fn(&str) -> Option<String>,
{
    match store.select_first().await {
        Ok(Some(credential)) => {
            debug!(name = %credential.name(), "credential resolved from store");
            return Some(credential);
        }
        Ok(None) => {}
        Err(e) => warn!("failed to read credential store: {}", e),
    }

    if let Some(mirror) = mirror {
        match mirror.read() {
            Ok(Some(credential)) => {
                debug!(name = %credential.name(), "credential resolved from mirror");
                return Some(credential);
            }
            Ok(None) => {}
            Err(e) => warn!(path = %mirror.path().display(), "failed to read credential mirror: {}", e),
        }
    }

    let token = env(ENV_TOKEN_KEY)?;
    let name = env(ENV_NAME_KEY)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ENV_NAME.to_string());
    let credential = UserCredential::new(name, token).ok()?;
    debug!(name = %credential.name(), "credential resolved from environment");
    Some(credential)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tempfile::TempDir;

    use super::*;
    use crate::sqlite::SqliteCredentialStore;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    async fn store_in(dir: &TempDir) -> SqliteCredentialStore {
        let store = SqliteCredentialStore::new(dir.path().join("credentials.db"));
        store.init().await.unwrap();
        store
    }

    #[tokio::test]
    async fn store_wins_over_mirror_and_env() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        store
            .insert(&UserCredential::new("ana", "from-store").unwrap())
            .await
            .unwrap();
        let mirror = CredentialMirror::new(dir.path().join("credentials.env"));
        mirror
            .write(&UserCredential::new("ana", "from-mirror").unwrap())
            .unwrap();

        let cred = resolve_credential(
            &store,
            Some(&mirror),
            env_from(&[(ENV_TOKEN_KEY, "from-env")]),
        )
        .await
        .unwrap();

        assert_eq!(cred.token(), "from-store");
    }

    #[tokio::test]
    async fn mirror_used_when_store_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        let mirror = CredentialMirror::new(dir.path().join("credentials.env"));
        mirror
            .write(&UserCredential::new("bob", "from-mirror").unwrap())
            .unwrap();

        let cred = resolve_credential(&store, Some(&mirror), env_from(&[]))
            .await
            .unwrap();

        assert_eq!(cred.name(), "bob");
        assert_eq!(cred.token(), "from-mirror");
    }

    #[tokio::test]
    async fn env_used_last_with_default_name() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;

        let cred = resolve_credential(&store, None, env_from(&[(ENV_TOKEN_KEY, " env-token ")]))
            .await
            .unwrap();

        assert_eq!(cred.name(), "default");
        assert_eq!(cred.token(), "env-token");
    }

    #[tokio::test]
    async fn env_name_is_honoured() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;

        let cred = resolve_credential(
            &store,
            None,
            env_from(&[(ENV_TOKEN_KEY, "t"), (ENV_NAME_KEY, "carla")]),
        )
        .await
        .unwrap();

        assert_eq!(cred.name(), "carla");
    }

    #[tokio::test]
    async fn nothing_resolves_to_none() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        let mirror = CredentialMirror::new(dir.path().join("absent.env"));

        assert!(resolve_credential(&store, Some(&mirror), env_from(&[]))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn blank_env_token_resolves_to_none() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;

        assert!(
            resolve_credential(&store, None, env_from(&[(ENV_TOKEN_KEY, "   ")]))
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn unreadable_store_falls_through_to_env() {
        let dir = TempDir::new().unwrap();
        // Never initialised: the table is missing, so the query fails.
        let store = SqliteCredentialStore::new(dir.path().join("credentials.db"));

        let cred = resolve_credential(&store, None, env_from(&[(ENV_TOKEN_KEY, "t")]))
            .await
            .unwrap();

        assert_eq!(cred.token(), "t");
    }
}
