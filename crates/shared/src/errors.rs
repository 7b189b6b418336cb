//! Error envelope shared by every settings crate.
//!
//! Typed module errors (`SchemaError`, `ConfigSchemaError`, backend errors)
//! convert into an [`ErrorEnvelope`] at crate boundaries. The store only ever
//! shows [`ErrorEnvelope::user_message`] to users.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fmt, io};

/// Metadata attached to errors for diagnostics.
pub type ErrorMetadata = BTreeMap<String, String>;

/// Message surfaced when a failure carries no usable description.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Whether a failure was anticipated by the caller's contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Validation failures, bad input, declined writes.
    Expected,
    /// Backend outages, I/O, anything from outside the process.
    Unexpected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Expected => "expected",
            Self::Unexpected => "unexpected",
        })
    }
}

/// Retry classification for failure handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// The operation can be retried safely.
    Retriable,
    /// The operation should not be retried.
    NonRetriable,
}

impl ErrorClass {
    /// Returns true when the error is considered retriable.
    #[must_use]
    pub const fn is_retriable(self) -> bool {
        matches!(self, Self::Retriable)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Retriable => "retriable",
            Self::NonRetriable => "non-retriable",
        })
    }
}

/// Stable `namespace:code` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode {
    namespace: String,
    code: String,
}

impl ErrorCode {
    /// Create a code in any namespace (`config`, `cli`, ...).
    pub fn new(namespace: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            code: code.into(),
        }
    }

    /// Malformed caller input.
    pub fn invalid_input() -> Self {
        Self::new("core", "invalid_input")
    }

    /// A file or record does not exist.
    pub fn not_found() -> Self {
        Self::new("core", "not_found")
    }

    /// Any other I/O failure.
    pub fn io() -> Self {
        Self::new("core", "io")
    }

    /// Internal failure with no better classification.
    pub fn internal() -> Self {
        Self::new("core", "internal")
    }

    /// The persistence backend could not be read at all.
    pub fn backend_unavailable() -> Self {
        Self::new("settings", "backend_unavailable")
    }

    /// A single field write was rejected by the persistence backend.
    pub fn persistence_failed() -> Self {
        Self::new("settings", "persistence_failed")
    }

    /// A field name is not part of the schema registry.
    pub fn unknown_field() -> Self {
        Self::new("settings", "unknown_field")
    }

    /// A value does not satisfy its field's semantic type.
    pub fn invalid_value() -> Self {
        Self::new("settings", "invalid_value")
    }

    /// Returns the namespace portion.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the code identifier.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.namespace, self.code)
    }
}

/// Structured error crossing crate boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Whether the failure was anticipated.
    pub kind: ErrorKind,
    /// Retry classification.
    pub class: ErrorClass,
    /// Stable error code.
    pub code: ErrorCode,
    /// Raw message; may be blank.
    pub message: String,
    /// Additional diagnostic metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: ErrorMetadata,
}

impl ErrorEnvelope {
    /// An anticipated, non-retriable failure.
    pub fn expected(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::build(ErrorKind::Expected, ErrorClass::NonRetriable, code, message)
    }

    /// A failure from outside the process.
    pub fn unexpected(code: ErrorCode, message: impl Into<String>, class: ErrorClass) -> Self {
        Self::build(ErrorKind::Unexpected, class, code, message)
    }

    fn build(
        kind: ErrorKind,
        class: ErrorClass,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            class,
            code,
            message: message.into(),
            metadata: ErrorMetadata::new(),
        }
    }

    /// Attach a single metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Message safe to show to a user.
    ///
    /// Falls back to [`UNKNOWN_ERROR_MESSAGE`] when the failure carried no
    /// description.
    #[must_use]
    pub fn user_message(&self) -> &str {
        let trimmed = self.message.trim();
        if trimmed.is_empty() {
            UNKNOWN_ERROR_MESSAGE
        } else {
            trimmed
        }
    }
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} {} {}: {}",
            self.kind,
            self.class,
            self.code,
            self.user_message()
        )
    }
}

impl std::error::Error for ErrorEnvelope {}

impl From<io::Error> for ErrorEnvelope {
    fn from(error: io::Error) -> Self {
        let kind = error.kind();
        let code = if kind == io::ErrorKind::NotFound {
            ErrorCode::not_found()
        } else {
            ErrorCode::io()
        };
        let class = if is_transient_io(kind) {
            ErrorClass::Retriable
        } else {
            ErrorClass::NonRetriable
        };
        Self::unexpected(code, error.to_string(), class)
    }
}

const fn is_transient_io(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
            | io::ErrorKind::Interrupted
            | io::ErrorKind::ResourceBusy
    )
}
