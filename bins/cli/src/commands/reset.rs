//! Reset command handler.

use super::error_line;
use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, render_json, render_names};
use settings_app::SettingsStore;
use settings_domain::SettingKey;

/// Restore every field to its default.
pub async fn run_reset(store: &SettingsStore, mode: OutputMode) -> Result<CliOutput, CliError> {
    let complete = store.reset_settings().await;
    let failed: Vec<&str> = store
        .recovered_fields()
        .iter()
        .map(|key| key.as_str())
        .collect();

    let stdout = if mode.is_json() {
        render_json(&serde_json::json!({
            "reset": complete,
            "failedFields": failed,
            "error": store.error(),
        }))?
    } else if complete {
        format!("reset: all {} settings restored to defaults\n", SettingKey::COUNT)
    } else {
        format!("reset: partial; failed: {}\n", render_names(&failed))
    };

    Ok(CliOutput {
        stdout,
        stderr: error_line(store.error().as_deref()),
        exit_code: if complete {
            ExitCode::Ok
        } else {
            ExitCode::Failed
        },
    })
}
