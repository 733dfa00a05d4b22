//! Credential storage locations.

use std::path::PathBuf;

use parley_common::ConfigError;
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "parley";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database path; empty uses the platform data directory.
    pub database: String,
    /// Credential mirror file path; empty uses the platform data directory.
    pub mirror: String,
    pub mirror_enabled: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: String::new(),
            mirror: String::new(),
            mirror_enabled: true,
        }
    }
}

impl StorageConfig {
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        resolve(&self.database, "credentials.db")
    }

    /// Mirror file path, or `None` when the mirror is disabled.
    pub fn mirror_path(&self) -> Result<Option<PathBuf>, ConfigError> {
        if !self.mirror_enabled {
            return Ok(None);
        }
        resolve(&self.mirror, "credentials.env").map(Some)
    }
}

fn resolve(configured: &str, file_name: &str) -> Result<PathBuf, ConfigError> {
    let configured = configured.trim();
    if !configured.is_empty() {
        return Ok(PathBuf::from(configured));
    }
    let data_dir = dirs::data_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine data directory".into()))?;
    Ok(data_dir.join(APP_DIR).join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_paths_are_used_verbatim() {
        let storage = StorageConfig {
            database: "/tmp/parley/creds.db".into(),
            mirror: "/tmp/parley/creds.env".into(),
            mirror_enabled: true,
        };
        assert_eq!(
            storage.database_path().unwrap(),
            PathBuf::from("/tmp/parley/creds.db")
        );
        assert_eq!(
            storage.mirror_path().unwrap(),
            Some(PathBuf::from("/tmp/parley/creds.env"))
        );
    }

    #[test]
    fn disabled_mirror_has_no_path() {
        let storage = StorageConfig {
            mirror_enabled: false,
            ..StorageConfig::default()
        };
        assert_eq!(storage.mirror_path().unwrap(), None);
    }

    #[test]
    fn default_paths_live_under_app_dir() {
        // Depends on a resolvable data directory, which CI may not have.
        if let Ok(path) = StorageConfig::default().database_path() {
            let path_str = path.to_string_lossy();
            assert!(path_str.contains("parley"));
            assert!(path_str.ends_with("credentials.db"));
        }
    }
}
