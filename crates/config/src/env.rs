//! Environment variable parsing and env-to-config merging.
//!
//! Env parsing is strict: a variable that is present must be non-empty and
//! well-formed, otherwise loading fails fast.

use crate::schema::{BackendKind, OutputFormat, SettingsServiceConfig, ValidatedServiceConfig};
use settings_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Env var: backend kind (`jsonFile`, `sqlite`, `memory`).
pub const ENV_BACKEND: &str = "SETTINGS_BACKEND";
/// Env var: backend path.
pub const ENV_BACKEND_PATH: &str = "SETTINGS_BACKEND_PATH";
/// Env var: notifications enabled.
pub const ENV_NOTIFICATIONS: &str = "SETTINGS_NOTIFICATIONS";
/// Env var: log filter directive.
pub const ENV_LOG_LEVEL: &str = "SETTINGS_LOG_LEVEL";
/// Env var: log format (`text`, `json`).
pub const ENV_LOG_FORMAT: &str = "SETTINGS_LOG_FORMAT";

const ALL_ENV_VARS: [&str; 5] = [
    ENV_BACKEND,
    ENV_BACKEND_PATH,
    ENV_NOTIFICATIONS,
    ENV_LOG_LEVEL,
    ENV_LOG_FORMAT,
];

/// Parsed env overrides; `None` means the variable was not set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceEnv {
    /// Backend kind override.
    pub backend: Option<BackendKind>,
    /// Backend path override.
    pub backend_path: Option<PathBuf>,
    /// Notifications toggle override.
    pub notifications: Option<bool>,
    /// Log directive override.
    pub log_level: Option<Box<str>>,
    /// Log format override.
    pub log_format: Option<OutputFormat>,
}

impl ServiceEnv {
    /// Parse env overrides from a key/value map (useful for tests).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            backend: parse_optional_backend(map, ENV_BACKEND)?,
            backend_path: parse_optional_trimmed_string(map, ENV_BACKEND_PATH)?
                .map(|value| PathBuf::from(value.as_ref())),
            notifications: parse_optional_bool(map, ENV_NOTIFICATIONS)?,
            log_level: parse_optional_trimmed_string(map, ENV_LOG_LEVEL)?,
            log_format: parse_optional_format(map, ENV_LOG_FORMAT)?,
        })
    }

    /// Parse env overrides from the current process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let map: BTreeMap<String, String> = ALL_ENV_VARS
            .iter()
            .filter_map(|name| {
                std::env::var(name)
                    .ok()
                    .map(|value| ((*name).to_owned(), value))
            })
            .collect();
        Self::from_map(&map)
    }

    /// Whether no override is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.backend.is_none()
            && self.backend_path.is_none()
            && self.notifications.is_none()
            && self.log_level.is_none()
            && self.log_format.is_none()
    }
}

/// Apply env overrides to a base config (env wins over file/default values).
pub fn apply_env_overrides(
    base: SettingsServiceConfig,
    env: &ServiceEnv,
) -> Result<ValidatedServiceConfig, ErrorEnvelope> {
    let mut config = base;
    if let Some(kind) = env.backend {
        config.backend.kind = kind;
    }
    if let Some(path) = &env.backend_path {
        config.backend.path = Some(path.clone());
    }
    if let Some(enabled) = env.notifications {
        config.notifications.enabled = enabled;
    }
    if let Some(level) = &env.log_level {
        config.logging.level = level.to_string();
    }
    if let Some(format) = env.log_format {
        config.logging.format = format;
    }

    config.validate_and_normalize().map_err(Into::into)
}

/// Validation failures when parsing env variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Boolean env var had an invalid value.
    InvalidBool {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Enum env var had an invalid value.
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidBool { .. } => ErrorCode::new("config", "invalid_env_bool"),
            Self::InvalidEnum { .. } => ErrorCode::new("config", "invalid_env_enum"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidBool { var, .. } => write!(formatter, "{var} must be a boolean"),
            Self::InvalidEnum { var, .. } => write!(formatter, "{var} has an unsupported value"),
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidBool { var, value } | EnvParseError::InvalidEnum { var, value } => {
                envelope
                    .with_metadata("env_var", var)
                    .with_metadata("value", value)
            },
        }
    }
}

fn parse_optional_trimmed_string(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Box<str>>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    Ok(Some(trimmed.to_owned().into_boxed_str()))
}

fn parse_optional_bool(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<bool>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(EnvParseError::InvalidBool {
            var,
            value: raw.clone(),
        }),
    }
}

fn parse_optional_backend(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<BackendKind>, EnvParseError> {
    let Some(raw) = parse_optional_trimmed_string(map, var)? else {
        return Ok(None);
    };
    BackendKind::parse(&raw)
        .map(Some)
        .ok_or_else(|| EnvParseError::InvalidEnum {
            var,
            value: raw.to_string(),
        })
}

fn parse_optional_format(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<OutputFormat>, EnvParseError> {
    let Some(raw) = parse_optional_trimmed_string(map, var)? else {
        return Ok(None);
    };
    OutputFormat::parse(&raw)
        .map(Some)
        .ok_or_else(|| EnvParseError::InvalidEnum {
            var,
            value: raw.to_string(),
        })
}
