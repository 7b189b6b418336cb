//! Settings stored as one JSON object in a file.

use super::error::BackendStoreError;
use serde_json::Value;
use settings_ports::{BackendInfo, BoxFuture, RawSettings, SettingsBackendPort};
use settings_shared::{ErrorEnvelope, Result};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// File-backed settings store.
///
/// Every write re-reads the file, applies one key, and replaces the file via
/// a temp-file rename. Writes from this process are serialized; concurrent
/// writers in other processes are not coordinated.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    info: BackendInfo,
    write_lock: Mutex<()>,
}

impl JsonFileBackend {
    /// Create a backend for the given file. The file need not exist.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let info = BackendInfo::new("jsonFile").with_location(path.display().to_string());
        Self {
            path,
            info,
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the settings file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> std::result::Result<RawSettings, BackendStoreError> {
        let payload = match tokio::fs::read(&self.path).await {
            Ok(payload) => payload,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(RawSettings::new());
            },
            Err(source) => {
                return Err(BackendStoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            },
        };

        let value: Value =
            serde_json::from_slice(&payload).map_err(|source| BackendStoreError::Decode {
                path: self.path.clone(),
                source,
            })?;
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            _ => Err(BackendStoreError::NotAnObject {
                path: self.path.clone(),
            }),
        }
    }

    async fn write_map(&self, map: &RawSettings) -> std::result::Result<(), BackendStoreError> {
        let write_error = |source| BackendStoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(write_error)?;
        }

        let mut payload = serde_json::to_vec_pretty(map).map_err(BackendStoreError::Encode)?;
        payload.push(b'\n');

        let temp_path = temp_path_for(&self.path);
        tokio::fs::write(&temp_path, payload)
            .await
            .map_err(write_error)?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(write_error)?;
        Ok(())
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map_or_else(|| "settings".to_owned(), |name| name.to_string_lossy().into_owned());
    path.with_file_name(format!(".{file_name}.tmp"))
}

impl SettingsBackendPort for JsonFileBackend {
    fn get_all_settings(&self) -> BoxFuture<'_, Result<RawSettings>> {
        Box::pin(async move { self.read_map().await.map_err(ErrorEnvelope::from) })
    }

    fn set_setting<'a>(&'a self, name: &'a str, value: Value) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            let _guard = self.write_lock.lock().await;
            let mut map = self.read_map().await?;
            map.insert(name.to_owned(), value);
            self.write_map(&map).await?;
            Ok(true)
        })
    }

    fn describe(&self) -> &BackendInfo {
        &self.info
    }
}
