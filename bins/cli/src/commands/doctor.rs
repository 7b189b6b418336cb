//! Doctor command handler.

use super::{error_line, exit_for_load};
use crate::CliOutput;
use crate::error::CliError;
use crate::format::{OutputMode, render_json, render_names};
use serde::Serialize;
use settings_app::SettingsStore;
use settings_domain::{CURRENT_SETTINGS_VERSION, LoadOutcome, SettingKey};
use std::fmt::Write as _;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DoctorReport<'a> {
    backend: &'a str,
    location: Option<&'a str>,
    schema_version: u32,
    outcome: LoadOutcome,
    migrated_from: Option<u32>,
    recovered_fields: Vec<SettingKey>,
    error: Option<String>,
}

/// Load once and report how the stored data was reconciled.
pub async fn run_doctor(
    store: &SettingsStore,
    mode: OutputMode,
    backend: &str,
    location: Option<&str>,
) -> Result<CliOutput, CliError> {
    let report = store.load_settings().await;
    let exit_code = exit_for_load(&report);
    let doctor = DoctorReport {
        backend,
        location,
        schema_version: CURRENT_SETTINGS_VERSION,
        outcome: report.outcome,
        migrated_from: report.migrated_from,
        recovered_fields: report.recovered_fields,
        error: store.error(),
    };

    let stdout = if mode.is_json() {
        render_json(&doctor)?
    } else {
        format_doctor_text(&doctor)
    };

    Ok(CliOutput {
        stdout,
        stderr: error_line(doctor.error.as_deref()),
        exit_code,
    })
}

fn format_doctor_text(doctor: &DoctorReport<'_>) -> String {
    let recovered: Vec<&str> = doctor
        .recovered_fields
        .iter()
        .map(|key| key.as_str())
        .collect();
    let mut output = String::new();
    let _ = writeln!(
        output,
        "backend: {} ({})",
        doctor.backend,
        doctor.location.unwrap_or("in-process")
    );
    let _ = writeln!(output, "schemaVersion: {}", doctor.schema_version);
    let _ = writeln!(output, "outcome: {:?}", doctor.outcome);
    let _ = writeln!(
        output,
        "migratedFrom: {}",
        doctor
            .migrated_from
            .map_or_else(|| "none".to_owned(), |version| version.to_string())
    );
    let _ = writeln!(output, "recoveredFields: {}", render_names(&recovered));
    let _ = writeln!(output, "error: {}", doctor.error.as_deref().unwrap_or("none"));
    output
}
