//! Validation for the backend section.

use crate::schema::ParleyConfig;

use super::helpers::{validate_not_blank, validate_range, validate_range_f64};

/// Validate backend constraints.
pub(crate) fn validate_backend(errors: &mut Vec<String>, config: &ParleyConfig) {
    let backend = &config.backend;

    validate_not_blank(errors, "backend.model", &backend.model);
    if !(backend.base_url.starts_with("http://") || backend.base_url.starts_with("https://")) {
        errors.push(format!(
            "backend.base_url = {:?} must start with http:// or https://",
            backend.base_url
        ));
    }
    validate_range(errors, "backend.max_tokens", backend.max_tokens, 1, 65536);
    validate_range_f64(errors, "backend.temperature", backend.temperature, 0.0, 2.0);
    validate_range(
        errors,
        "backend.connect_timeout_secs",
        backend.connect_timeout_secs,
        1,
        120,
    );
    validate_range(
        errors,
        "backend.request_timeout_secs",
        backend.request_timeout_secs,
        1,
        600,
    );
}
