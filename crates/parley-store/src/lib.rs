//! Credential persistence for parley.
//!
//! A single-table SQLite store is authoritative; a dotenv-style mirror file
//! is a redundant local copy. Registration writes both, and startup resolves
//! a credential from the store, the mirror, or the environment.

pub mod error;
pub mod mirror;
pub mod registration;
pub mod resolve;
pub mod sqlite;

pub use error::{RegistrationError, StoreError, StoreResult};
pub use mirror::CredentialMirror;
pub use registration::register;
pub use resolve::{resolve_credential, ENV_NAME_KEY, ENV_TOKEN_KEY};
pub use sqlite::{CredentialStore, SqliteCredentialStore};
