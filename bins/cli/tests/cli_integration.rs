//! CLI integration tests.

use serde_json::{Value, json};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

type TestResult = Result<(), Box<dyn Error>>;

fn temp_dir(prefix: &str) -> Result<PathBuf, Box<dyn Error>> {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
    let dir = std::env::temp_dir().join(format!("{prefix}-{nanos}"));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn run_cli(store: &Path, args: &[&str]) -> std::io::Result<Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_setctl"));
    for (key, _) in std::env::vars() {
        if key.starts_with("SETTINGS_") {
            command.env_remove(key);
        }
    }
    command
        .env("SETTINGS_LOG_LEVEL", "error")
        .env("SETTINGS_BACKEND_PATH", store)
        .args(args)
        .output()
}

fn stdout_json(output: &Output) -> Result<Value, Box<dyn Error>> {
    Ok(serde_json::from_slice(&output.stdout)?)
}

fn stored(path: &Path) -> Result<Value, Box<dyn Error>> {
    Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}

#[test]
fn fields_lists_the_registry_in_order() -> TestResult {
    let dir = temp_dir("setctl-fields")?;
    let output = run_cli(&dir.join("s.json"), &["fields", "--output", "json"])?;
    assert_eq!(output.status.code(), Some(0));

    let rows = stdout_json(&output)?;
    let names: Vec<&str> = rows
        .as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|row| row.get("name").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(names.len(), 20);
    assert_eq!(names.first(), Some(&"theme"));
    assert_eq!(names.last(), Some(&"maxSessions"));
    Ok(())
}

#[test]
fn fresh_store_shows_defaults() -> TestResult {
    let dir = temp_dir("setctl-show")?;
    let output = run_cli(&dir.join("s.json"), &["show", "--output", "json"])?;
    assert_eq!(output.status.code(), Some(0));

    let state = stdout_json(&output)?;
    assert_eq!(state.pointer("/settings/theme"), Some(&json!("dark")));
    assert_eq!(state.pointer("/settings/dailyBudget"), Some(&Value::Null));
    assert_eq!(state.get("isLoaded"), Some(&json!(true)));
    assert_eq!(state.get("recoveredFields"), Some(&json!([])));
    Ok(())
}

#[test]
fn set_persists_across_processes() -> TestResult {
    let dir = temp_dir("setctl-set")?;
    let path = dir.join("s.json");

    let output = run_cli(&path, &["set", "theme", "nord"])?;
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "theme = \"nord\"\n");

    let output = run_cli(&path, &["set", "fontSize", "16"])?;
    assert_eq!(output.status.code(), Some(0));

    let output = run_cli(&path, &["get", "theme"])?;
    assert_eq!(String::from_utf8_lossy(&output.stdout), "\"nord\"\n");

    let file = stored(&path)?;
    assert_eq!(file.get("theme"), Some(&json!("nord")));
    assert_eq!(file.get("fontSize"), Some(&json!(16)));
    Ok(())
}

#[test]
fn invalid_input_exits_with_code_two_and_writes_nothing() -> TestResult {
    let dir = temp_dir("setctl-invalid")?;
    let path = dir.join("s.json");

    let output = run_cli(&path, &["set", "fontSize", "99"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid value for fontSize"));

    let output = run_cli(&path, &["get", "colour"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown setting: colour"));

    assert!(!path.exists());
    Ok(())
}

#[test]
fn corrupted_fields_are_recovered_and_rewritten() -> TestResult {
    let dir = temp_dir("setctl-recover")?;
    let path = dir.join("s.json");
    std::fs::write(
        &path,
        r#"{ "_settingsVersion": 3, "theme": "nord", "fontSize": "huge", "maxSessions": 0 }"#,
    )?;

    let output = run_cli(&path, &["show", "--output", "json"])?;
    assert_eq!(output.status.code(), Some(0));
    let state = stdout_json(&output)?;
    assert_eq!(
        state.get("recoveredFields"),
        Some(&json!(["fontSize", "maxSessions"]))
    );
    assert_eq!(state.pointer("/settings/theme"), Some(&json!("nord")));
    assert!(String::from_utf8_lossy(&output.stderr).contains(
        "[warning] Settings Recovered: 2 settings were corrupted and have been reset to defaults: fontSize, maxSessions"
    ));

    let file = stored(&path)?;
    assert_eq!(file.get("fontSize"), Some(&json!(14)));
    assert_eq!(file.get("maxSessions"), Some(&json!(8)));
    Ok(())
}

#[test]
fn unreadable_store_falls_back_to_defaults_with_exit_one() -> TestResult {
    let dir = temp_dir("setctl-unreadable")?;
    let path = dir.join("s.json");
    std::fs::write(&path, "{ not json")?;

    let output = run_cli(&path, &["show", "--output", "json"])?;
    assert_eq!(output.status.code(), Some(1));
    let state = stdout_json(&output)?;
    assert_eq!(state.pointer("/settings/theme"), Some(&json!("dark")));
    assert!(state.get("error").and_then(Value::as_str).is_some());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Settings Unavailable"));
    Ok(())
}

#[test]
fn doctor_reports_migration_source() -> TestResult {
    let dir = temp_dir("setctl-doctor")?;
    let path = dir.join("s.json");
    std::fs::write(&path, r#"{ "theme": "legacy-blue", "fontSize": 18 }"#)?;

    let output = run_cli(&path, &["doctor", "--output", "json"])?;
    assert_eq!(output.status.code(), Some(0));
    let report = stdout_json(&output)?;
    assert_eq!(report.get("backend"), Some(&json!("jsonFile")));
    assert_eq!(report.get("outcome"), Some(&json!("migrated")));
    assert_eq!(report.get("migratedFrom"), Some(&json!(1)));
    assert_eq!(report.get("schemaVersion"), Some(&json!(3)));

    let file = stored(&path)?;
    assert_eq!(file.get("_settingsVersion"), Some(&json!(3)));
    assert_eq!(file.get("theme"), Some(&json!("dark")));
    assert_eq!(file.get("fontSize"), Some(&json!(18)));
    Ok(())
}

#[test]
fn reset_restores_defaults() -> TestResult {
    let dir = temp_dir("setctl-reset")?;
    let path = dir.join("s.json");
    std::fs::write(&path, r#"{ "_settingsVersion": 3, "theme": "nord", "copyOnSelect": true }"#)?;

    let output = run_cli(&path, &["reset"])?;
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "reset: all 20 settings restored to defaults\n"
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("[success] Settings Reset"));

    let file = stored(&path)?;
    assert_eq!(file.get("theme"), Some(&json!("dark")));
    assert_eq!(file.get("copyOnSelect"), Some(&json!(false)));
    assert_eq!(file.get("_settingsVersion"), Some(&json!(3)));
    Ok(())
}

#[test]
fn sqlite_backend_round_trips() -> TestResult {
    let dir = temp_dir("setctl-sqlite")?;
    let path = dir.join("settings.db");

    let output = run_cli(
        &path,
        &["--backend", "sqlite", "set", "environmentPassthrough", r#"["PATH"]"#],
    )?;
    assert_eq!(output.status.code(), Some(0));

    let output = run_cli(
        &path,
        &["--backend", "sqlite", "get", "environmentPassthrough", "--output", "json"],
    )?;
    let payload = stdout_json(&output)?;
    assert_eq!(payload.get("value"), Some(&json!(["PATH"])));
    Ok(())
}

#[test]
fn config_commands_report_effective_config() -> TestResult {
    let dir = temp_dir("setctl-config")?;
    let store = dir.join("s.json");

    let output = run_cli(&store, &["config", "show", "--output", "json", "--backend", "memory"])?;
    assert_eq!(output.status.code(), Some(0));
    let config = stdout_json(&output)?;
    assert_eq!(config.pointer("/backend/kind"), Some(&json!("memory")));
    assert_eq!(config.pointer("/logging/level"), Some(&json!("error")));

    let output = run_cli(&store, &["config", "schema"])?;
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout_json(&output)?.get("properties").is_some());

    let bad = dir.join("service.toml");
    std::fs::write(&bad, "version = 9\n")?;
    let bad_arg = bad.to_string_lossy().to_string();
    let output = run_cli(&store, &["--config", &bad_arg, "config", "check"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unsupported config version"));

    let missing = dir.join("missing.toml").to_string_lossy().to_string();
    let output = run_cli(&store, &["--config", &missing, "show"])?;
    assert_eq!(output.status.code(), Some(3));
    Ok(())
}
