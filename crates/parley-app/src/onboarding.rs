//! First-run registration prompt.

use std::io::Write;

use parley_common::{ParleyError, UserCredential};
use parley_store::{register, CredentialMirror, CredentialStore, RegistrationError};
use tracing::info;

use crate::input::LineSource;

/// Ask for a name and token until one registers.
///
/// Returns `Ok(None)` if the user leaves before registering.
pub async fn prompt_registration(
    input: &mut dyn LineSource,
    out: &mut dyn Write,
    store: &dyn CredentialStore,
    mirror: Option<&CredentialMirror>,
) -> Result<Option<UserCredential>, ParleyError> {
    writeln!(
        out,
        "No credential found. Register a name and your Gemini API token."
    )?;

    loop {
        let Some(name) = input.read_line("Name: ")? else {
            return Ok(None);
        };
        let Some(token) = input.read_line("API token: ")? else {
            return Ok(None);
        };

        match register(store, mirror, &name, &token).await {
            Ok(credential) => {
                writeln!(out, "Registered {}.", credential.name())?;
                return Ok(Some(credential));
            }
            Err(RegistrationError::Validation(e)) => {
                info!("registration rejected: {e}");
                writeln!(out, "Invalid input: {e}. Please try again.")?;
            }
            Err(RegistrationError::Store(e)) => return Err(store_error(e)),
        }
    }
}

pub fn registration_error(error: RegistrationError) -> ParleyError {
    match error {
        RegistrationError::Validation(e) => ParleyError::Validation(e),
        RegistrationError::Store(e) => store_error(e),
    }
}

pub fn store_error(error: parley_store::StoreError) -> ParleyError {
    ParleyError::Storage(error.to_string())
}
