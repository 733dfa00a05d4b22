//! Flat key-value mirror of the registered credential.
//!
//! The file uses dotenv syntax so it can double as an `.env` file:
//!
//! ```text
//! PARLEY_USER_NAME="ana"
//! GENAI_API_KEY="abc123"
//! ```

use std::path::{Path, PathBuf};

use parley_common::UserCredential;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::resolve::{ENV_NAME_KEY, ENV_TOKEN_KEY};

#[derive(Debug, Clone)]
pub struct CredentialMirror {
    path: PathBuf,
}

impl CredentialMirror {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the credential, replacing any previous content.
    ///
    /// Writes to a `.tmp` sibling first and renames it into place.
    pub fn write(&self, credential: &UserCredential) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = format!(
            "{ENV_NAME_KEY}=\"{}\"\n{ENV_TOKEN_KEY}=\"{}\"\n",
            escape(credential.name()),
            escape(credential.token())
        );

        let tmp_path = self.path.with_extension("env.tmp");
        std::fs::write(&tmp_path, &content)?;

        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            // Rename can fail on Windows when the target is open; write in place.
            warn!("atomic rename failed ({}), falling back to direct write", e);
            std::fs::write(&self.path, &content)?;
        }

        debug!(path = %self.path.display(), "credential mirror written");
        Ok(())
    }

    /// Read the mirrored credential; `None` when the file or a key is missing.
    pub fn read(&self) -> StoreResult<Option<UserCredential>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let entries = dotenvy::from_path_iter(&self.path)
            .map_err(|e| StoreError::Mirror(e.to_string()))?;

        let mut name = None;
        let mut token = None;
        for entry in entries {
            let (key, value) = entry.map_err(|e| StoreError::Mirror(e.to_string()))?;
            match key.as_str() {
                ENV_NAME_KEY => name = Some(value),
                ENV_TOKEN_KEY => token = Some(value),
                _ => {}
            }
        }

        Ok(match (name, token) {
            (Some(name), Some(token)) => UserCredential::new(name, token).ok(),
            _ => None,
        })
    }
}

/// Escape a value for a double-quoted dotenv string.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}
