//! Settings stored as rows in a SQLite database.

use super::error::BackendStoreError;
use rusqlite::Connection;
use serde_json::Value;
use settings_ports::{BackendInfo, BoxFuture, RawSettings, SettingsBackendPort};
use settings_shared::{ErrorEnvelope, Result};
use std::path::{Path, PathBuf};
use tokio::task::spawn_blocking;

const SCHEMA_VERSION: i64 = 1;

type StoreResult<T> = std::result::Result<T, BackendStoreError>;

/// SQLite-backed settings store, one row per key.
#[derive(Debug)]
pub struct SqliteBackend {
    path: PathBuf,
    info: BackendInfo,
}

impl SqliteBackend {
    /// Create a backend for the given database file. The file need not exist.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let info = BackendInfo::new("sqlite").with_location(path.display().to_string());
        Self { path, info }
    }

    /// Location of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> StoreResult<RawSettings> {
        let path = self.path.clone();
        spawn_blocking(move || {
            let conn = open_connection(&path)?;
            let mut statement = conn
                .prepare("SELECT key, value_json FROM settings")
                .map_err(|source| BackendStoreError::SqliteRead {
                    operation: "prepare",
                    source,
                })?;
            let rows = statement
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
                .map_err(|source| BackendStoreError::SqliteRead {
                    operation: "query",
                    source,
                })?;

            let mut map = RawSettings::new();
            for row in rows {
                let (key, value_json) = row.map_err(|source| BackendStoreError::SqliteRead {
                    operation: "row",
                    source,
                })?;
                let value = serde_json::from_str(&value_json).unwrap_or(Value::Null);
                map.insert(key, value);
            }
            Ok(map)
        })
        .await
        .map_err(|error| BackendStoreError::Task(error.to_string()))?
    }

    async fn write_one(&self, name: &str, value: &Value) -> StoreResult<()> {
        let path = self.path.clone();
        let key = name.to_owned();
        let value_json = serde_json::to_string(value).map_err(BackendStoreError::Encode)?;
        spawn_blocking(move || {
            let conn = open_connection(&path)?;
            conn.execute(
                "INSERT INTO settings (key, value_json) VALUES (?1, ?2) \
                 ON CONFLICT(key) DO UPDATE SET value_json = excluded.value_json",
                (&key, &value_json),
            )
            .map_err(|source| BackendStoreError::SqliteWrite {
                operation: "upsert",
                source,
            })?;
            Ok(())
        })
        .await
        .map_err(|error| BackendStoreError::Task(error.to_string()))?
    }
}

fn open_connection(path: &Path) -> StoreResult<Connection> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| BackendStoreError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let conn = Connection::open(path).map_err(|source| BackendStoreError::SqliteRead {
        operation: "open",
        source,
    })?;

    conn.execute_batch("PRAGMA journal_mode = WAL;")
        .map_err(|source| BackendStoreError::SqliteRead {
            operation: "pragma",
            source,
        })?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS settings (\
             key TEXT PRIMARY KEY, \
             value_json TEXT NOT NULL\
         );",
    )
    .map_err(|source| BackendStoreError::SqliteWrite {
        operation: "schema",
        source,
    })?;

    let version: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|source| BackendStoreError::SqliteRead {
            operation: "version",
            source,
        })?;
    if version == 0 {
        conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))
            .map_err(|source| BackendStoreError::SqliteWrite {
                operation: "version set",
                source,
            })?;
    }

    Ok(conn)
}

impl SettingsBackendPort for SqliteBackend {
    fn get_all_settings(&self) -> BoxFuture<'_, Result<RawSettings>> {
        Box::pin(async move { self.read_all().await.map_err(ErrorEnvelope::from) })
    }

    fn set_setting<'a>(&'a self, name: &'a str, value: Value) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            self.write_one(name, &value).await?;
            Ok(true)
        })
    }

    fn describe(&self) -> &BackendInfo {
        &self.info
    }
}
