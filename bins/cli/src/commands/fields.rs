//! Fields command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, render_json, render_value};
use serde::Serialize;
use serde_json::Value;
use settings_domain::descriptors;
use std::fmt::Write as _;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldRow {
    name: &'static str,
    semantic_type: String,
    default: Value,
    description: &'static str,
}

/// Print the schema registry in order.
pub fn run_fields(mode: OutputMode) -> Result<CliOutput, CliError> {
    let stdout = if mode.is_json() {
        let rows: Vec<FieldRow> = descriptors()
            .map(|descriptor| FieldRow {
                name: descriptor.name(),
                semantic_type: descriptor.semantic_type.describe(),
                default: descriptor.default_value().to_json(),
                description: descriptor.description,
            })
            .collect();
        render_json(&rows)?
    } else {
        let mut output = String::new();
        for descriptor in descriptors() {
            let _ = writeln!(
                output,
                "{:<24} {:<48} default={}",
                descriptor.name(),
                descriptor.semantic_type.describe(),
                render_value(&descriptor.default_value())?
            );
        }
        output
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
