//! SQLite-backed credential store.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use parley_common::UserCredential;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Persistent `{name, token}` pairs, keyed by name.
///
/// The app treats the first row as "the" registered user.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn init(&self) -> StoreResult<()>;

    /// With a name, whether that name is stored; without, whether any row is.
    async fn exists(&self, name: Option<&str>) -> StoreResult<bool>;

    async fn insert(&self, credential: &UserCredential) -> StoreResult<()>;

    async fn update(&self, credential: &UserCredential) -> StoreResult<()>;

    /// Insert, or replace the token of an existing name, in one statement.
    async fn upsert(&self, credential: &UserCredential) -> StoreResult<()>;

    /// The earliest stored credential.
    async fn select_first(&self) -> StoreResult<Option<UserCredential>>;

    async fn count(&self) -> StoreResult<u64>;
}

#[derive(Debug, Clone)]
pub struct SqliteCredentialStore {
    db_path: PathBuf,
}

impl SqliteCredentialStore {
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    async fn with_connection<T, F>(&self, func: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let connection = open_connection(&db_path)?;
            func(&connection)
        })
        .await
        .map_err(|error| StoreError::Task(error.to_string()))?
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn init(&self) -> StoreResult<()> {
        self.with_connection(|connection| {
            connection.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS credential (
                    name TEXT PRIMARY KEY,
                    token TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                "#,
            )?;
            Ok(())
        })
        .await
    }

    async fn exists(&self, name: Option<&str>) -> StoreResult<bool> {
        let name = name.map(str::to_string);

        self.with_connection(move |connection| {
            let found = match name {
                Some(name) => connection
                    .query_row(
                        "SELECT 1 FROM credential WHERE name = ?1",
                        params![name],
                        |_| Ok(()),
                    )
                    .optional()?,
                None => connection
                    .query_row("SELECT 1 FROM credential LIMIT 1", [], |_| Ok(()))
                    .optional()?,
            };
            Ok(found.is_some())
        })
        .await
    }

    async fn insert(&self, credential: &UserCredential) -> StoreResult<()> {
        let name = credential.name().to_string();
        let token = credential.token().to_string();
        let updated_at = chrono::Utc::now().to_rfc3339();

        self.with_connection(move |connection| {
            let result = connection.execute(
                "INSERT INTO credential (name, token, updated_at) VALUES (?1, ?2, ?3)",
                params![name, token, updated_at],
            );
            match result {
                Ok(_) => {
                    debug!(%name, "credential inserted");
                    Ok(())
                }
                Err(rusqlite::Error::SqliteFailure(error, _))
                    if error.code == ErrorCode::ConstraintViolation =>
                {
                    Err(StoreError::Duplicate(name))
                }
                Err(error) => Err(error.into()),
            }
        })
        .await
    }

    async fn update(&self, credential: &UserCredential) -> StoreResult<()> {
        let name = credential.name().to_string();
        let token = credential.token().to_string();
        let updated_at = chrono::Utc::now().to_rfc3339();

        self.with_connection(move |connection| {
            let changed = connection.execute(
                "UPDATE credential SET token = ?1, updated_at = ?2 WHERE name = ?3",
                params![token, updated_at, name],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(name));
            }
            debug!(%name, "credential updated");
            Ok(())
        })
        .await
    }

    async fn upsert(&self, credential: &UserCredential) -> StoreResult<()> {
        let name = credential.name().to_string();
        let token = credential.token().to_string();
        let updated_at = chrono::Utc::now().to_rfc3339();

        self.with_connection(move |connection| {
            connection.execute(
                "INSERT INTO credential (name, token, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(name) DO UPDATE SET
                    token = excluded.token,
                    updated_at = excluded.updated_at",
                params![name, token, updated_at],
            )?;
            debug!(%name, "credential upserted");
            Ok(())
        })
        .await
    }

    async fn select_first(&self) -> StoreResult<Option<UserCredential>> {
        self.with_connection(|connection| {
            let row = connection
                .query_row(
                    "SELECT name, token FROM credential ORDER BY rowid LIMIT 1",
                    [],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
                )
                .optional()?;

            // Rows written by other tools may hold blanks; treat those as absent.
            Ok(row.and_then(|(name, token)| UserCredential::new(name, token).ok()))
        })
        .await
    }

    async fn count(&self) -> StoreResult<u64> {
        self.with_connection(|connection| {
            let count: i64 =
                connection.query_row("SELECT COUNT(*) FROM credential", [], |row| row.get(0))?;
            Ok(count.unsigned_abs())
        })
        .await
    }
}

fn open_connection(path: &Path) -> StoreResult<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let connection = Connection::open(path)?;
    // Concurrent writers wait for each other; the last one wins.
    connection.busy_timeout(Duration::from_secs(5))?;
    Ok(connection)
}
