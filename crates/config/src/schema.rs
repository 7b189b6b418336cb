//! Service configuration schema, defaults, and validation.
//!
//! - Deserialization uses `serde` (JSON or TOML).
//! - Validation is manual and returns typed errors mapped to `ErrorEnvelope`.
//! - Normalization trims the log directive and drops an empty backend path.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use settings_shared::{ErrorCode, ErrorEnvelope};
use std::fmt;
use std::path::PathBuf;

/// Current supported configuration schema version.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Default location of the JSON settings file.
pub const DEFAULT_BACKEND_PATH: &str = ".settings/settings.json";

/// Default `EnvFilter` directive.
pub const DEFAULT_LOG_LEVEL: &str = "info";

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Top-level service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct SettingsServiceConfig {
    /// Schema version for forward-compatible migrations.
    pub version: u32,
    /// Persistence backend selection.
    pub backend: BackendSection,
    /// User notification output.
    pub notifications: NotificationsSection,
    /// Diagnostic logging.
    pub logging: LoggingSection,
}

impl Default for SettingsServiceConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            backend: BackendSection::default(),
            notifications: NotificationsSection::default(),
            logging: LoggingSection::default(),
        }
    }
}

impl SettingsServiceConfig {
    /// Validate and normalize the config.
    pub fn validate_and_normalize(
        mut self,
    ) -> Result<ValidatedServiceConfig, ConfigSchemaError> {
        self.validate_version()?;
        self.backend.normalize();
        self.backend.validate()?;
        self.logging.normalize();
        self.logging.validate()?;
        Ok(ValidatedServiceConfig { raw: self })
    }

    const fn validate_version(&self) -> Result<(), ConfigSchemaError> {
        if self.version != CURRENT_CONFIG_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_CONFIG_VERSION,
            });
        }
        Ok(())
    }
}

/// Validated config wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedServiceConfig {
    raw: SettingsServiceConfig,
}

impl ValidatedServiceConfig {
    /// Borrow the raw config.
    #[must_use]
    pub const fn as_ref(&self) -> &SettingsServiceConfig {
        &self.raw
    }

    /// Consume the wrapper and return the raw config.
    #[must_use]
    pub fn into_inner(self) -> SettingsServiceConfig {
        self.raw
    }
}

impl AsRef<SettingsServiceConfig> for ValidatedServiceConfig {
    fn as_ref(&self) -> &SettingsServiceConfig {
        &self.raw
    }
}

impl std::ops::Deref for ValidatedServiceConfig {
    type Target = SettingsServiceConfig;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

/// Parse a service config from a JSON string, applying validation.
pub fn parse_service_config_json(input: &str) -> Result<ValidatedServiceConfig, ErrorEnvelope> {
    let config: SettingsServiceConfig = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid config JSON: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Parse a service config from a TOML string, applying validation.
pub fn parse_service_config_toml(input: &str) -> Result<ValidatedServiceConfig, ErrorEnvelope> {
    let config: SettingsServiceConfig = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid config TOML: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// JSON Schema describing [`SettingsServiceConfig`].
#[must_use]
pub fn service_config_schema() -> schemars::Schema {
    schemars::schema_for!(SettingsServiceConfig)
}

/// Which persistence backend stores the settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum BackendKind {
    /// One JSON object in a file.
    #[default]
    JsonFile,
    /// A SQLite database.
    Sqlite,
    /// Process-local memory; nothing survives the process.
    Memory,
}

impl BackendKind {
    /// Stable identifier used in config files and env vars.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JsonFile => "jsonFile",
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }

    /// Parse an identifier, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "jsonfile" | "json" => Some(Self::JsonFile),
            "sqlite" => Some(Self::Sqlite),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }

    /// Whether the backend needs a filesystem path.
    #[must_use]
    pub const fn requires_path(self) -> bool {
        matches!(self, Self::JsonFile | Self::Sqlite)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Persistence backend configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct BackendSection {
    /// Backend kind.
    pub kind: BackendKind,
    /// Store location; required for `jsonFile` and `sqlite`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            path: Some(PathBuf::from(DEFAULT_BACKEND_PATH)),
        }
    }
}

impl BackendSection {
    fn normalize(&mut self) {
        if self
            .path
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            self.path = None;
        }
    }

    fn validate(&self) -> Result<(), ConfigSchemaError> {
        if self.kind.requires_path() && self.path.is_none() {
            return Err(ConfigSchemaError::MissingBackendPath { kind: self.kind });
        }
        Ok(())
    }
}

/// Rendering for console-facing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl OutputFormat {
    /// Parse an identifier, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Notification output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct NotificationsSection {
    /// Whether notifications are shown at all.
    pub enabled: bool,
    /// Notification rendering.
    pub format: OutputFormat,
}

impl Default for NotificationsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            format: OutputFormat::Text,
        }
    }
}

/// Diagnostic logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct LoggingSection {
    /// `EnvFilter` directive such as `info` or `settings_app=debug,warn`.
    pub level: String,
    /// Log line format.
    pub format: OutputFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_owned(),
            format: OutputFormat::Text,
        }
    }
}

impl LoggingSection {
    fn normalize(&mut self) {
        let trimmed = self.level.trim();
        if trimmed.len() != self.level.len() {
            self.level = trimmed.to_owned();
        }
    }

    fn validate(&self) -> Result<(), ConfigSchemaError> {
        if is_valid_log_directive(&self.level) {
            Ok(())
        } else {
            Err(ConfigSchemaError::InvalidLogLevel {
                value: self.level.clone(),
            })
        }
    }
}

/// Loose check of an `EnvFilter` directive list.
///
/// Each comma-separated directive is either a bare level, a bare target, or
/// `target=level`.
#[must_use]
pub fn is_valid_log_directive(directive: &str) -> bool {
    if directive.trim().is_empty() {
        return false;
    }
    directive.split(',').all(|part| {
        let part = part.trim();
        match part.split_once('=') {
            Some((target, level)) => is_valid_target(target.trim()) && is_level(level.trim()),
            None => is_level(part) || is_valid_target(part),
        }
    })
}

fn is_level(value: &str) -> bool {
    LOG_LEVELS.contains(&value.to_ascii_lowercase().as_str())
}

fn is_valid_target(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | ':' | '-'))
}

/// Typed validation failures for the service config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// Config version is not supported.
    UnsupportedVersion {
        /// Version found in the config.
        found: u32,
        /// Supported version.
        supported: u32,
    },
    /// A path-based backend was selected without a path.
    MissingBackendPath {
        /// Selected backend.
        kind: BackendKind,
    },
    /// The log directive is not understood.
    InvalidLogLevel {
        /// Rejected directive.
        value: String,
    },
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::new("config", "unsupported_version"),
            Self::MissingBackendPath { .. } => ErrorCode::new("config", "missing_backend_path"),
            Self::InvalidLogLevel { .. } => ErrorCode::new("config", "invalid_log_level"),
        }
    }
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => {
                write!(
                    formatter,
                    "unsupported config version: {found} (supported: {supported})"
                )
            },
            Self::MissingBackendPath { kind } => {
                write!(formatter, "backend.path is required for the {kind} backend")
            },
            Self::InvalidLogLevel { value } => {
                write!(formatter, "logging.level is not a valid filter: {value}")
            },
        }
    }
}

impl std::error::Error for ConfigSchemaError {}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            ConfigSchemaError::UnsupportedVersion { found, supported } => envelope
                .with_metadata("found", found.to_string())
                .with_metadata("supported", supported.to_string()),
            ConfigSchemaError::MissingBackendPath { kind } => envelope
                .with_metadata("section", "backend")
                .with_metadata("kind", kind.as_str()),
            ConfigSchemaError::InvalidLogLevel { value } => envelope
                .with_metadata("section", "logging")
                .with_metadata("value", value),
        }
    }
}
