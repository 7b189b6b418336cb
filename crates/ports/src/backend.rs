//! Persistence backend boundary contract.

use crate::BoxFuture;
use serde_json::Value;
use settings_domain::RawSettings;
use settings_shared::Result;

/// Static description of a backend, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendInfo {
    /// Backend kind identifier (e.g. "jsonFile").
    pub kind: Box<str>,
    /// Human-readable location (path, DSN), when the backend has one.
    pub location: Option<Box<str>>,
}

impl BackendInfo {
    /// Describe a backend without a location.
    #[must_use]
    pub fn new(kind: impl Into<Box<str>>) -> Self {
        Self {
            kind: kind.into(),
            location: None,
        }
    }

    /// Attach a location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<Box<str>>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Boundary contract for the raw key/value settings store.
///
/// Backends are opaque and non-transactional: every write is independent and
/// may fail on its own.
pub trait SettingsBackendPort: Send + Sync {
    /// Read the whole raw map, including legacy keys and the version marker.
    fn get_all_settings(&self) -> BoxFuture<'_, Result<RawSettings>>;

    /// Persist one raw value.
    ///
    /// `Ok(false)` means the backend declined the write.
    fn set_setting<'a>(&'a self, name: &'a str, value: Value) -> BoxFuture<'a, Result<bool>>;

    /// Describe the backend.
    fn describe(&self) -> &BackendInfo;
}
