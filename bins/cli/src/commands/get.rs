//! Get command handler.

use super::{error_line, exit_for_load};
use crate::CliOutput;
use crate::error::CliError;
use crate::format::{OutputMode, render_json, render_value};
use settings_app::SettingsStore;
use settings_domain::SettingKey;

/// Load and print one field.
pub async fn run_get(
    store: &SettingsStore,
    mode: OutputMode,
    name: &str,
) -> Result<CliOutput, CliError> {
    let key = SettingKey::parse(name)?;
    let report = store.load_settings().await;
    let value = store.get(key);

    let stdout = if mode.is_json() {
        render_json(&serde_json::json!({
            "field": key.as_str(),
            "value": value.to_json(),
            "recovered": report.recovered_fields.contains(&key),
        }))?
    } else {
        format!("{}\n", render_value(&value)?)
    };

    Ok(CliOutput {
        stdout,
        stderr: error_line(store.error().as_deref()),
        exit_code: exit_for_load(&report),
    })
}
