//! Process-local settings store.

use serde_json::Value;
use settings_ports::{BackendInfo, BoxFuture, RawSettings, SettingsBackendPort};
use settings_shared::Result;
use tokio::sync::RwLock;

/// Settings kept in memory for the lifetime of the process.
#[derive(Debug)]
pub struct InMemoryBackend {
    data: RwLock<RawSettings>,
    info: BackendInfo,
}

impl InMemoryBackend {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_data(RawSettings::new())
    }

    /// Create a store seeded with raw data.
    #[must_use]
    pub fn with_data(data: RawSettings) -> Self {
        Self {
            data: RwLock::new(data),
            info: BackendInfo::new("memory"),
        }
    }

    /// Copy of the stored map.
    pub async fn snapshot(&self) -> RawSettings {
        self.data.read().await.clone()
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsBackendPort for InMemoryBackend {
    fn get_all_settings(&self) -> BoxFuture<'_, Result<RawSettings>> {
        Box::pin(async move { Ok(self.data.read().await.clone()) })
    }

    fn set_setting<'a>(&'a self, name: &'a str, value: Value) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            self.data.write().await.insert(name.to_owned(), value);
            Ok(true)
        })
    }

    fn describe(&self) -> &BackendInfo {
        &self.info
    }
}
