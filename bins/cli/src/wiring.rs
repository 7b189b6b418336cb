//! Service config resolution and store construction.

use crate::error::CliError;
use clap::{Args, ValueEnum};
use settings_adapters::{
    ConsoleFormat, ConsoleNotifier, InMemoryBackend, JsonFileBackend, SilentNotifier,
    SqliteBackend, StderrLineSink, TracingLogger,
};
use settings_app::{SettingsStore, SettingsStoreDeps};
use settings_config::{
    BackendKind, DEFAULT_LOG_LEVEL, LoggingSection, OutputFormat as ConfigFormat,
    SettingsServiceConfig, ValidatedServiceConfig, load_service_config_std_env,
};
use settings_ports::{LoggerPort, NotifierPort, SettingsBackendPort};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Backend choices accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    /// One JSON object in a file.
    #[value(name = "jsonFile", alias = "json")]
    JsonFile,
    /// A SQLite database.
    Sqlite,
    /// Process-local memory.
    Memory,
}

impl From<BackendArg> for BackendKind {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::JsonFile => Self::JsonFile,
            BackendArg::Sqlite => Self::Sqlite,
            BackendArg::Memory => Self::Memory,
        }
    }
}

/// Flags that select the service config and backend.
#[derive(Debug, Args)]
pub struct ServiceArgs {
    /// Service config file (JSON or TOML).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Backend override.
    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendArg>,
    /// Backend path override.
    #[arg(long, global = true)]
    pub backend_path: Option<PathBuf>,
}

/// Resolve the effective config: flags > env > file > defaults.
pub fn load_config(args: &ServiceArgs) -> Result<ValidatedServiceConfig, CliError> {
    let config = load_service_config_std_env(args.config.as_deref())?;
    if args.backend.is_none() && args.backend_path.is_none() {
        return Ok(config);
    }

    let mut raw = config.into_inner();
    if let Some(kind) = args.backend {
        raw.backend.kind = kind.into();
    }
    if let Some(path) = &args.backend_path {
        raw.backend.path = Some(path.clone());
    }
    raw.validate_and_normalize()
        .map_err(|error| CliError::Config(error.into()))
}

/// Install the global `tracing` subscriber on stderr.
///
/// Returns false when a subscriber was already installed. That is the only
/// way the install can fail; the existing subscriber stays in place and
/// receives a debug event about the skipped install.
pub fn init_tracing(logging: &LoggingSection) -> bool {
    let filter =
        EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);
    let installed = match logging.format {
        ConfigFormat::Json => builder.json().try_init(),
        ConfigFormat::Text => builder.try_init(),
    };
    match installed {
        Ok(()) => true,
        Err(error) => {
            tracing::debug!(error = %error, "tracing subscriber already installed");
            false
        },
    }
}

/// Build a store wired to the configured backend and notifier.
pub fn build_store(config: &SettingsServiceConfig) -> Result<SettingsStore, CliError> {
    let backend: Arc<dyn SettingsBackendPort> = match config.backend.kind {
        BackendKind::JsonFile => Arc::new(JsonFileBackend::new(backend_path(config)?)),
        BackendKind::Sqlite => Arc::new(SqliteBackend::new(backend_path(config)?)),
        BackendKind::Memory => Arc::new(InMemoryBackend::new()),
    };

    let notifier: Arc<dyn NotifierPort> = if config.notifications.enabled {
        let format = match config.notifications.format {
            ConfigFormat::Text => ConsoleFormat::Text,
            ConfigFormat::Json => ConsoleFormat::Json,
        };
        Arc::new(ConsoleNotifier::new(Arc::new(StderrLineSink), format))
    } else {
        Arc::new(SilentNotifier)
    };

    let logger: Arc<dyn LoggerPort> = Arc::new(TracingLogger::new());
    Ok(SettingsStore::new(SettingsStoreDeps {
        backend,
        notifier,
        logger: Some(logger),
    }))
}

fn backend_path(config: &SettingsServiceConfig) -> Result<PathBuf, CliError> {
    config.backend.path.clone().ok_or_else(|| {
        CliError::InvalidInput(format!(
            "backend.path is required for the {} backend",
            config.backend.kind
        ))
    })
}

/// Drive a future on a current-thread runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}
