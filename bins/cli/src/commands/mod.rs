//! CLI command handlers.

pub mod config;
pub mod doctor;
pub mod fields;
pub mod get;
pub mod reset;
pub mod set;
pub mod show;

pub use config::{run_config_check, run_config_schema, run_config_show};
pub use doctor::run_doctor;
pub use fields::run_fields;
pub use get::run_get;
pub use reset::run_reset;
pub use set::run_set;
pub use show::run_show;

use crate::error::ExitCode;
use settings_domain::{LoadOutcome, LoadReport};

/// A load that fell back to defaults counts as a failed operation.
const fn exit_for_load(report: &LoadReport) -> ExitCode {
    match report.outcome {
        LoadOutcome::Failed => ExitCode::Failed,
        LoadOutcome::Clean | LoadOutcome::Recovered | LoadOutcome::Migrated => ExitCode::Ok,
    }
}

fn error_line(error: Option<&str>) -> String {
    error.map_or_else(String::new, |cause| format!("error: {cause}\n"))
}
