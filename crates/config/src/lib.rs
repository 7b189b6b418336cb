//! # settings-config
//!
//! Service configuration for the settings CLI: backend selection,
//! notifications, and logging, loaded from JSON/TOML files and env vars.
//! This crate depends on `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Config loading helpers (env + file).
pub mod load;
/// Configuration schema types and helpers.
pub mod schema;

pub use env::{
    ENV_BACKEND, ENV_BACKEND_PATH, ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_NOTIFICATIONS,
    EnvParseError, ServiceEnv, apply_env_overrides,
};
pub use load::{
    load_service_config_from_path, load_service_config_from_sources,
    load_service_config_std_env, to_pretty_json, to_pretty_toml,
};
pub use schema::{
    BackendKind, BackendSection, CURRENT_CONFIG_VERSION, ConfigSchemaError, DEFAULT_BACKEND_PATH,
    DEFAULT_LOG_LEVEL, LoggingSection, NotificationsSection, OutputFormat, SettingsServiceConfig,
    ValidatedServiceConfig, is_valid_log_directive, parse_service_config_json,
    parse_service_config_toml, service_config_schema,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
