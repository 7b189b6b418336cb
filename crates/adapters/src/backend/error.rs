//! Backend-local failures and their mapping into error envelopes.

use settings_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the bundled persistence backends.
#[derive(Debug, Error)]
pub enum BackendStoreError {
    /// The store could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Store location.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The store could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Store location.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Stored bytes are not valid JSON.
    #[error("{} is not valid JSON: {source}", path.display())]
    Decode {
        /// Store location.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// Stored JSON is valid but not an object.
    #[error("{} must contain a JSON object", path.display())]
    NotAnObject {
        /// Store location.
        path: PathBuf,
    },
    /// A value could not be encoded.
    #[error("failed to encode settings: {0}")]
    Encode(#[source] serde_json::Error),
    /// A SQLite read failed.
    #[error("sqlite {operation} failed: {source}")]
    SqliteRead {
        /// Statement or step that failed.
        operation: &'static str,
        /// Underlying driver error.
        #[source]
        source: rusqlite::Error,
    },
    /// A SQLite write failed.
    #[error("sqlite {operation} failed: {source}")]
    SqliteWrite {
        /// Statement or step that failed.
        operation: &'static str,
        /// Underlying driver error.
        #[source]
        source: rusqlite::Error,
    },
    /// A blocking task panicked or was cancelled.
    #[error("backend task failed: {0}")]
    Task(String),
}

impl BackendStoreError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::Read { .. }
            | Self::Decode { .. }
            | Self::NotAnObject { .. }
            | Self::SqliteRead { .. }
            | Self::Task(_) => ErrorCode::backend_unavailable(),
            Self::Write { .. } | Self::Encode(_) | Self::SqliteWrite { .. } => {
                ErrorCode::persistence_failed()
            },
        }
    }

    const fn class(&self) -> ErrorClass {
        match self {
            Self::Decode { .. } | Self::NotAnObject { .. } | Self::Encode(_) => {
                ErrorClass::NonRetriable
            },
            _ => ErrorClass::Retriable,
        }
    }

    fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::Decode { path, .. }
            | Self::NotAnObject { path } => Some(path),
            _ => None,
        }
    }
}

impl From<BackendStoreError> for ErrorEnvelope {
    fn from(error: BackendStoreError) -> Self {
        let path = error.path().map(|path| path.display().to_string());
        let envelope = Self::unexpected(error.error_code(), error.to_string(), error.class());
        match path {
            Some(path) => envelope.with_metadata("path", path),
            None => envelope,
        }
    }
}
