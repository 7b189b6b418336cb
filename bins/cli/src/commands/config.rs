//! Config command handlers.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, render_json};
use settings_config::{SettingsServiceConfig, service_config_schema, to_pretty_json, to_pretty_toml};

/// Print the effective config (TOML for text output, JSON otherwise).
pub fn run_config_show(
    config: &SettingsServiceConfig,
    mode: OutputMode,
) -> Result<CliOutput, CliError> {
    let stdout = if mode.is_json() {
        to_pretty_json(config)?
    } else {
        to_pretty_toml(config)?
    };
    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

/// Report a successfully validated config.
pub fn run_config_check(
    config: &SettingsServiceConfig,
    mode: OutputMode,
) -> Result<CliOutput, CliError> {
    let location = config
        .backend
        .path
        .as_ref()
        .map(|path| path.display().to_string());
    let stdout = if mode.is_json() {
        render_json(&serde_json::json!({
            "status": "ok",
            "backend": config.backend.kind.as_str(),
            "path": location,
        }))?
    } else {
        format!(
            "status: ok\nbackend: {}\npath: {}\n",
            config.backend.kind,
            location.as_deref().unwrap_or("none")
        )
    };
    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

/// Print the JSON Schema of the service config.
pub fn run_config_schema() -> Result<CliOutput, CliError> {
    Ok(CliOutput {
        stdout: render_json(&service_config_schema())?,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
