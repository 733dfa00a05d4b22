//! Validation for smaller config sections: prompt and logging.

use crate::schema::ParleyConfig;

use super::helpers::{validate_not_blank, validate_range};

/// Validate prompt constraints.
pub(crate) fn validate_prompt(errors: &mut Vec<String>, config: &ParleyConfig) {
    validate_not_blank(errors, "prompt.apology", &config.prompt.apology);
}

/// Validate logging constraints.
pub(crate) fn validate_logging(errors: &mut Vec<String>, config: &ParleyConfig) {
    validate_range(
        errors,
        "logging.max_logged_chars",
        config.logging.max_logged_chars,
        16,
        10000,
    );
}
