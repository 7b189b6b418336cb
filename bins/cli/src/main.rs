//! CLI binary entrypoint.

mod commands;
mod error;
mod format;
mod wiring;

use clap::{Parser, Subcommand};
use commands::{
    run_config_check, run_config_schema, run_config_show, run_doctor, run_fields, run_get,
    run_reset, run_set, run_show,
};
use error::{CliError, ExitCode};
use format::{OutputArgs, OutputMode};
use settings_app::SettingsStore;
use std::io::{self, Write};
use wiring::{ServiceArgs, block_on, build_store, init_tracing, load_config};

#[derive(Debug, Parser)]
#[command(
    name = "setctl",
    version,
    about = "Inspect and edit persisted settings",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    service: ServiceArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load and print every setting.
    Show,
    /// Load and print one setting.
    Get {
        /// Setting name, e.g. `fontSize`.
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Validate and persist one setting.
    Set {
        /// Setting name, e.g. `fontSize`.
        #[arg(value_name = "KEY")]
        key: String,
        /// JSON value; bare words are taken as strings.
        #[arg(value_name = "JSON", allow_hyphen_values = true)]
        value: String,
    },
    /// Restore every setting to its default.
    Reset,
    /// List the setting schema.
    Fields,
    /// Report recovery and migration details of the stored settings.
    Doctor,
    /// Service config commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Print the effective service config.
    Show,
    /// Validate the service config.
    Check,
    /// Print the JSON Schema of the service config.
    Schema,
}

pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let mode = OutputMode::from_args(&cli.output);

    match run(&cli, mode) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(cli: &Cli, mode: OutputMode) -> Result<CliOutput, CliError> {
    match &cli.command {
        Commands::Fields => return run_fields(mode),
        Commands::Config {
            command: ConfigCommands::Schema,
        } => return run_config_schema(),
        _ => {},
    }

    let config = load_config(&cli.service)?;
    match &cli.command {
        Commands::Config { command } => match command {
            ConfigCommands::Show => run_config_show(&config, mode),
            ConfigCommands::Check => run_config_check(&config, mode),
            ConfigCommands::Schema => run_config_schema(),
        },
        command => {
            init_tracing(&config.logging);
            let store = build_store(&config)?;
            tracing::debug!(backend = %config.backend.kind, "setctl command started");
            block_on(run_store_command(command, &store, mode))?
        },
    }
}

async fn run_store_command(
    command: &Commands,
    store: &SettingsStore,
    mode: OutputMode,
) -> Result<CliOutput, CliError> {
    match command {
        Commands::Show => run_show(store, mode).await,
        Commands::Get { key } => run_get(store, mode, key).await,
        Commands::Set { key, value } => run_set(store, mode, key, value).await,
        Commands::Reset => run_reset(store, mode).await,
        Commands::Doctor => {
            let info = store.backend_info();
            run_doctor(store, mode, &info.kind, info.location.as_deref()).await
        },
        Commands::Fields | Commands::Config { .. } => {
            Err(CliError::InvalidInput("unsupported CLI command".to_owned()))
        },
    }
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }

    Ok(())
}
