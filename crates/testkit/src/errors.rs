//! Test fixtures for shared error codes and envelopes.

use settings_shared::{ErrorClass, ErrorCode, ErrorEnvelope};

/// Return a list of error codes the settings store surfaces.
pub fn common_error_codes() -> Vec<ErrorCode> {
    vec![
        ErrorCode::invalid_input(),
        ErrorCode::not_found(),
        ErrorCode::io(),
        ErrorCode::internal(),
        ErrorCode::backend_unavailable(),
        ErrorCode::persistence_failed(),
        ErrorCode::unknown_field(),
        ErrorCode::invalid_value(),
    ]
}

/// A backend-unreachable error fixture.
pub fn backend_unavailable_error() -> ErrorEnvelope {
    ErrorEnvelope::unexpected(
        ErrorCode::backend_unavailable(),
        "backend unreachable",
        ErrorClass::Retriable,
    )
}

/// A failed-write error fixture.
pub fn persistence_error() -> ErrorEnvelope {
    ErrorEnvelope::unexpected(
        ErrorCode::persistence_failed(),
        "write rejected",
        ErrorClass::Retriable,
    )
}

/// An error that carries no message, as raised by some foreign backends.
pub fn messageless_error() -> ErrorEnvelope {
    ErrorEnvelope::unexpected(ErrorCode::internal(), "", ErrorClass::NonRetriable)
}
