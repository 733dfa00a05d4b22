pub mod credential;
pub mod errors;
pub mod id;

pub use credential::UserCredential;
pub use errors::{ConfigError, ConfigurationError, InvalidUsageError, ParleyError, ValidationError};
pub use id::SessionId;

/// Fixed text shown as the assistant turn when a backend call fails.
pub const DEFAULT_APOLOGY: &str = "Sorry, an error occurred while generating the response.";

pub type Result<T> = std::result::Result<T, ParleyError>;
