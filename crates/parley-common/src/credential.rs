//! The per-user access token for the hosted model backend.

use std::fmt;

use crate::errors::ValidationError;

/// A registered user's name and backend token.
///
/// Both fields are trimmed and guaranteed non-empty; construct through
/// [`UserCredential::new`].
#[derive(Clone, PartialEq, Eq)]
pub struct UserCredential {
    name: String,
    token: String,
}

impl fmt::Debug for UserCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredential")
            .field("name", &self.name)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl UserCredential {
    pub fn new(name: impl AsRef<str>, token: impl AsRef<str>) -> Result<Self, ValidationError> {
        let name = name.as_ref().trim();
        let token = token.as_ref().trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if token.is_empty() {
            return Err(ValidationError::EmptyToken);
        }
        Ok(Self {
            name: name.to_string(),
            token: token.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}
