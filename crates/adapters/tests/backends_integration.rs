//! Shared behavior checks across the bundled backends.

use serde_json::{Value, json};
use settings_adapters::{InMemoryBackend, JsonFileBackend, SqliteBackend};
use settings_ports::SettingsBackendPort;
use settings_shared::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}-{nanos}"))
}

async fn assert_backend_contract(backend: &dyn SettingsBackendPort) -> Result<()> {
    assert!(backend.get_all_settings().await?.is_empty());

    assert!(backend.set_setting("_settingsVersion", json!(3)).await?);
    assert!(backend.set_setting("theme", json!("nord")).await?);
    assert!(backend.set_setting("dailyBudget", Value::Null).await?);
    assert!(backend.set_setting("legacyField", json!({"nested": true})).await?);
    assert!(backend.set_setting("theme", json!("light")).await?);

    let stored = backend.get_all_settings().await?;
    assert_eq!(stored.len(), 4);
    assert_eq!(stored.get("_settingsVersion"), Some(&json!(3)));
    assert_eq!(stored.get("theme"), Some(&json!("light")));
    assert_eq!(stored.get("dailyBudget"), Some(&Value::Null));
    assert_eq!(stored.get("legacyField"), Some(&json!({"nested": true})));
    Ok(())
}

#[tokio::test]
async fn json_file_backend_honors_contract() -> Result<()> {
    let backend = JsonFileBackend::new(temp_dir("settings-contract-json").join("settings.json"));
    assert_backend_contract(&backend).await
}

#[tokio::test]
async fn sqlite_backend_honors_contract() -> Result<()> {
    let backend = SqliteBackend::new(temp_dir("settings-contract-sqlite").join("settings.db"));
    assert_backend_contract(&backend).await
}

#[tokio::test]
async fn memory_backend_honors_contract() -> Result<()> {
    assert_backend_contract(&InMemoryBackend::new()).await
}

#[tokio::test]
async fn concurrent_json_writes_are_not_lost() -> Result<()> {
    let backend = Arc::new(JsonFileBackend::new(
        temp_dir("settings-contract-concurrent").join("settings.json"),
    ));
    let mut tasks = Vec::new();
    for index in 0..8_u32 {
        let backend = Arc::clone(&backend);
        tasks.push(tokio::spawn(async move {
            backend
                .set_setting(&format!("key{index}"), json!(index))
                .await
        }));
    }
    for task in tasks {
        let written = task
            .await
            .map_err(|error| std::io::Error::other(error.to_string()))??;
        assert!(written);
    }

    assert_eq!(backend.get_all_settings().await?.len(), 8);
    Ok(())
}
