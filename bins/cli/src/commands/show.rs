//! Show command handler.

use super::{error_line, exit_for_load};
use crate::CliOutput;
use crate::error::CliError;
use crate::format::{OutputMode, render_json, render_names, render_value};
use settings_app::SettingsStore;
use settings_domain::SettingsState;
use std::fmt::Write as _;

/// Load and print every field with the store status.
pub async fn run_show(store: &SettingsStore, mode: OutputMode) -> Result<CliOutput, CliError> {
    let report = store.load_settings().await;
    let state = store.state();

    let stdout = if mode.is_json() {
        render_json(&state)?
    } else {
        format_state_text(&state)?
    };

    Ok(CliOutput {
        stdout,
        stderr: error_line(state.status.error.as_deref()),
        exit_code: exit_for_load(&report),
    })
}

fn format_state_text(state: &SettingsState) -> Result<String, CliError> {
    let mut output = String::new();
    for (key, value) in state.settings.iter() {
        let _ = writeln!(output, "{key} = {}", render_value(value)?);
    }
    let recovered: Vec<&str> = state
        .recovered_fields
        .iter()
        .map(|key| key.as_str())
        .collect();
    let _ = writeln!(output, "recoveredFields: {}", render_names(&recovered));
    let _ = writeln!(
        output,
        "error: {}",
        state.status.error.as_deref().unwrap_or("none")
    );
    Ok(output)
}
