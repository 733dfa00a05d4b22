use std::path::PathBuf;

/// Settings file problems.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// No usable credential to start a chat with.
///
/// Fatal to chatting, never to the process: callers fall back to registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("no credential registered; register a name and API token first")]
    MissingCredential,

    #[error("the registered API token is empty")]
    EmptyToken,

    #[error("backend client could not be created: {0}")]
    Backend(String),
}

/// Rejected registration input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("token must not be empty")]
    EmptyToken,
}

/// A negative amount was passed to the usage counter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("usage amount must be non-negative, got {amount}")]
pub struct InvalidUsageError {
    pub amount: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum ParleyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    InvalidUsage(#[from] InvalidUsageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("terminal error: {0}")]
    Terminal(String),
}
