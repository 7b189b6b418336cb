//! Set command handler.

use super::error_line;
use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, render_json, render_value};
use serde_json::Value;
use settings_app::SettingsStore;
use settings_domain::{SettingKey, validate_input};

/// Validate a value, load, then persist the field.
///
/// Input that is not valid JSON is taken as a plain string, so
/// `setctl set theme nord` works without shell quoting.
pub async fn run_set(
    store: &SettingsStore,
    mode: OutputMode,
    name: &str,
    raw: &str,
) -> Result<CliOutput, CliError> {
    let key = SettingKey::parse(name)?;
    let value = validate_input(key, &parse_input_value(raw))?;

    store.load_settings().await;
    let saved = store.update_setting(key, value).await;
    let current = store.get(key);

    let stdout = if mode.is_json() {
        render_json(&serde_json::json!({
            "field": key.as_str(),
            "saved": saved,
            "value": current.to_json(),
            "error": store.error(),
        }))?
    } else if saved {
        format!("{key} = {}\n", render_value(&current)?)
    } else {
        String::new()
    };

    Ok(CliOutput {
        stdout,
        stderr: error_line(store.error().as_deref()),
        exit_code: if saved { ExitCode::Ok } else { ExitCode::Failed },
    })
}

fn parse_input_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}
