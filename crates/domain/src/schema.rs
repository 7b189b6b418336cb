//! Schema registry: the static table of field descriptors.
//!
//! Every persisted setting is described exactly once here. Descriptors are
//! plain `static` data, so the registry needs no initialization and can never
//! be mutated at runtime. Registry order (`SettingKey::ALL`) is significant:
//! it drives validation order on load and the sequential write order of a
//! reset.

use crate::value::SettingValue;
use serde::{Deserialize, Serialize};
use settings_shared::{ErrorCode, ErrorEnvelope};
use std::fmt;

/// Identifier of a persisted setting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum SettingKey {
    /// Color theme identifier.
    Theme,
    /// Terminal font size in points.
    FontSize,
    /// Terminal font family.
    FontFamily,
    /// Line height multiplier.
    LineHeight,
    /// Cursor shape.
    CursorStyle,
    /// Whether the cursor blinks.
    CursorBlink,
    /// Scrollback buffer length in lines.
    ScrollbackLines,
    /// Shell launched for new sessions (empty = system default).
    DefaultShell,
    /// Starting directory for new sessions (empty = home).
    WorkingDirectory,
    /// Copy selected text to the clipboard automatically.
    CopyOnSelect,
    /// Ask before closing a window with running sessions.
    ConfirmOnClose,
    /// Terminal bell behavior.
    BellStyle,
    /// Desktop notifications for finished sessions.
    NotificationsEnabled,
    /// Daily spend limit (absent = unlimited).
    DailyBudget,
    /// Monthly spend limit (absent = unlimited).
    MonthlyBudget,
    /// Percentage of a budget that triggers a warning.
    BudgetWarningPercent,
    /// Commands agents may run without confirmation.
    AutoApprovedCommands,
    /// Environment variables forwarded into sessions.
    EnvironmentPassthrough,
    /// Anonymous usage reporting.
    TelemetryEnabled,
    /// Maximum concurrently open sessions.
    MaxSessions,
}

impl SettingKey {
    /// Every key, in registry order.
    pub const ALL: [Self; 20] = [
        Self::Theme,
        Self::FontSize,
        Self::FontFamily,
        Self::LineHeight,
        Self::CursorStyle,
        Self::CursorBlink,
        Self::ScrollbackLines,
        Self::DefaultShell,
        Self::WorkingDirectory,
        Self::CopyOnSelect,
        Self::ConfirmOnClose,
        Self::BellStyle,
        Self::NotificationsEnabled,
        Self::DailyBudget,
        Self::MonthlyBudget,
        Self::BudgetWarningPercent,
        Self::AutoApprovedCommands,
        Self::EnvironmentPassthrough,
        Self::TelemetryEnabled,
        Self::MaxSessions,
    ];

    /// Number of registered fields.
    pub const COUNT: usize = Self::ALL.len();

    /// Stored (camelCase) name of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Theme => "theme",
            Self::FontSize => "fontSize",
            Self::FontFamily => "fontFamily",
            Self::LineHeight => "lineHeight",
            Self::CursorStyle => "cursorStyle",
            Self::CursorBlink => "cursorBlink",
            Self::ScrollbackLines => "scrollbackLines",
            Self::DefaultShell => "defaultShell",
            Self::WorkingDirectory => "workingDirectory",
            Self::CopyOnSelect => "copyOnSelect",
            Self::ConfirmOnClose => "confirmOnClose",
            Self::BellStyle => "bellStyle",
            Self::NotificationsEnabled => "notificationsEnabled",
            Self::DailyBudget => "dailyBudget",
            Self::MonthlyBudget => "monthlyBudget",
            Self::BudgetWarningPercent => "budgetWarningPercent",
            Self::AutoApprovedCommands => "autoApprovedCommands",
            Self::EnvironmentPassthrough => "environmentPassthrough",
            Self::TelemetryEnabled => "telemetryEnabled",
            Self::MaxSessions => "maxSessions",
        }
    }

    /// Parse a stored field name.
    pub fn parse(name: &str) -> Result<Self, SchemaError> {
        let trimmed = name.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == trimmed)
            .ok_or_else(|| SchemaError::UnknownField {
                name: trimmed.to_owned(),
            })
    }

    /// Position of the key in registry order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Static descriptor for the key.
    #[must_use]
    pub const fn descriptor(self) -> &'static FieldDescriptor {
        match self {
            Self::Theme => &THEME,
            Self::FontSize => &FONT_SIZE,
            Self::FontFamily => &FONT_FAMILY,
            Self::LineHeight => &LINE_HEIGHT,
            Self::CursorStyle => &CURSOR_STYLE,
            Self::CursorBlink => &CURSOR_BLINK,
            Self::ScrollbackLines => &SCROLLBACK_LINES,
            Self::DefaultShell => &DEFAULT_SHELL,
            Self::WorkingDirectory => &WORKING_DIRECTORY,
            Self::CopyOnSelect => &COPY_ON_SELECT,
            Self::ConfirmOnClose => &CONFIRM_ON_CLOSE,
            Self::BellStyle => &BELL_STYLE,
            Self::NotificationsEnabled => &NOTIFICATIONS_ENABLED,
            Self::DailyBudget => &DAILY_BUDGET,
            Self::MonthlyBudget => &MONTHLY_BUDGET,
            Self::BudgetWarningPercent => &BUDGET_WARNING_PERCENT,
            Self::AutoApprovedCommands => &AUTO_APPROVED_COMMANDS,
            Self::EnvironmentPassthrough => &ENVIRONMENT_PASSTHROUGH,
            Self::TelemetryEnabled => &TELEMETRY_ENABLED,
            Self::MaxSessions => &MAX_SESSIONS,
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl std::str::FromStr for SettingKey {
    type Err = SchemaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

/// Semantic type of a field; each variant pairs with one total validator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SemanticType {
    /// A string drawn from a fixed member set.
    Enum {
        /// Accepted members.
        members: &'static [&'static str],
    },
    /// A finite number within `[min, max]`.
    BoundedNumber {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// `null`, or a finite number `>= min`.
    NullableNumber {
        /// Inclusive lower bound.
        min: f64,
    },
    /// Literal `true` / `false`.
    Boolean,
    /// An array whose elements are all strings.
    StringArray,
    /// Any string, including the empty string.
    FreeString,
}

impl SemanticType {
    /// Short human-readable description of the accepted shape.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Enum { members } => format!("one of {}", members.join(" | ")),
            Self::BoundedNumber { min, max } => format!("number in [{min}, {max}]"),
            Self::NullableNumber { min } => format!("null or number >= {min}"),
            Self::Boolean => "boolean".to_owned(),
            Self::StringArray => "array of strings".to_owned(),
            Self::FreeString => "string".to_owned(),
        }
    }
}

/// Default value in a form that can live in `static` data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    /// Boolean default.
    Bool(bool),
    /// Numeric default.
    Number(f64),
    /// Null default.
    Null,
    /// String default.
    Text(&'static str),
    /// String list default.
    TextList(&'static [&'static str]),
}

impl DefaultValue {
    /// Materialize as a canonical setting value.
    #[must_use]
    pub fn to_value(self) -> SettingValue {
        match self {
            Self::Bool(value) => SettingValue::Bool(value),
            Self::Number(value) => SettingValue::Number(value),
            Self::Null => SettingValue::Null,
            Self::Text(value) => SettingValue::Text(value.to_owned()),
            Self::TextList(values) => {
                SettingValue::TextList(values.iter().map(|value| (*value).to_owned()).collect())
            },
        }
    }
}

/// Static metadata for one configuration key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDescriptor {
    /// Key this descriptor belongs to.
    pub key: SettingKey,
    /// Accepted value shape.
    pub semantic_type: SemanticType,
    /// Value used when the stored one is missing or rejected.
    pub default: DefaultValue,
    /// One-line description for listings.
    pub description: &'static str,
}

impl FieldDescriptor {
    /// Stored name of the field.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.key.as_str()
    }

    /// Materialized default value.
    #[must_use]
    pub fn default_value(&self) -> SettingValue {
        self.default.to_value()
    }
}

/// Look up the descriptor of a key.
#[must_use]
pub const fn descriptor_for(key: SettingKey) -> &'static FieldDescriptor {
    key.descriptor()
}

/// Look up a descriptor by stored name.
pub fn descriptor_by_name(name: &str) -> Result<&'static FieldDescriptor, SchemaError> {
    SettingKey::parse(name).map(SettingKey::descriptor)
}

/// All field keys in registry order.
#[must_use]
pub const fn all_field_names() -> &'static [SettingKey] {
    &SettingKey::ALL
}

/// All descriptors in registry order.
pub fn descriptors() -> impl Iterator<Item = &'static FieldDescriptor> {
    SettingKey::ALL.into_iter().map(SettingKey::descriptor)
}

// =============================================================================
// REGISTRY DATA
// =============================================================================

/// Registered color theme identifiers.
pub const THEME_IDS: &[&str] = &[
    "dark",
    "light",
    "dracula",
    "nord",
    "solarized-dark",
    "solarized-light",
    "monokai",
    "high-contrast",
];

/// Cursor shapes.
pub const CURSOR_STYLES: &[&str] = &["block", "underline", "bar"];

/// Bell behaviors.
pub const BELL_STYLES: &[&str] = &["none", "visual", "sound"];

static THEME: FieldDescriptor = FieldDescriptor {
    key: SettingKey::Theme,
    semantic_type: SemanticType::Enum { members: THEME_IDS },
    default: DefaultValue::Text("dark"),
    description: "Color theme",
};

static FONT_SIZE: FieldDescriptor = FieldDescriptor {
    key: SettingKey::FontSize,
    semantic_type: SemanticType::BoundedNumber {
        min: 8.0,
        max: 32.0,
    },
    default: DefaultValue::Number(14.0),
    description: "Terminal font size (pt)",
};

static FONT_FAMILY: FieldDescriptor = FieldDescriptor {
    key: SettingKey::FontFamily,
    semantic_type: SemanticType::FreeString,
    default: DefaultValue::Text("monospace"),
    description: "Terminal font family",
};

static LINE_HEIGHT: FieldDescriptor = FieldDescriptor {
    key: SettingKey::LineHeight,
    semantic_type: SemanticType::BoundedNumber { min: 1.0, max: 3.0 },
    default: DefaultValue::Number(1.2),
    description: "Line height multiplier",
};

static CURSOR_STYLE: FieldDescriptor = FieldDescriptor {
    key: SettingKey::CursorStyle,
    semantic_type: SemanticType::Enum {
        members: CURSOR_STYLES,
    },
    default: DefaultValue::Text("block"),
    description: "Cursor shape",
};

static CURSOR_BLINK: FieldDescriptor = FieldDescriptor {
    key: SettingKey::CursorBlink,
    semantic_type: SemanticType::Boolean,
    default: DefaultValue::Bool(true),
    description: "Blink the cursor",
};

static SCROLLBACK_LINES: FieldDescriptor = FieldDescriptor {
    key: SettingKey::ScrollbackLines,
    semantic_type: SemanticType::BoundedNumber {
        min: 0.0,
        max: 100_000.0,
    },
    default: DefaultValue::Number(10_000.0),
    description: "Scrollback buffer length (lines)",
};

static DEFAULT_SHELL: FieldDescriptor = FieldDescriptor {
    key: SettingKey::DefaultShell,
    semantic_type: SemanticType::FreeString,
    default: DefaultValue::Text(""),
    description: "Shell for new sessions (empty = system default)",
};

static WORKING_DIRECTORY: FieldDescriptor = FieldDescriptor {
    key: SettingKey::WorkingDirectory,
    semantic_type: SemanticType::FreeString,
    default: DefaultValue::Text(""),
    description: "Starting directory for new sessions (empty = home)",
};

static COPY_ON_SELECT: FieldDescriptor = FieldDescriptor {
    key: SettingKey::CopyOnSelect,
    semantic_type: SemanticType::Boolean,
    default: DefaultValue::Bool(false),
    description: "Copy selection to clipboard",
};

static CONFIRM_ON_CLOSE: FieldDescriptor = FieldDescriptor {
    key: SettingKey::ConfirmOnClose,
    semantic_type: SemanticType::Boolean,
    default: DefaultValue::Bool(true),
    description: "Confirm before closing running sessions",
};

static BELL_STYLE: FieldDescriptor = FieldDescriptor {
    key: SettingKey::BellStyle,
    semantic_type: SemanticType::Enum {
        members: BELL_STYLES,
    },
    default: DefaultValue::Text("visual"),
    description: "Terminal bell behavior",
};

static NOTIFICATIONS_ENABLED: FieldDescriptor = FieldDescriptor {
    key: SettingKey::NotificationsEnabled,
    semantic_type: SemanticType::Boolean,
    default: DefaultValue::Bool(true),
    description: "Desktop notifications for finished sessions",
};

static DAILY_BUDGET: FieldDescriptor = FieldDescriptor {
    key: SettingKey::DailyBudget,
    semantic_type: SemanticType::NullableNumber { min: 0.0 },
    default: DefaultValue::Null,
    description: "Daily spend limit (null = unlimited)",
};

static MONTHLY_BUDGET: FieldDescriptor = FieldDescriptor {
    key: SettingKey::MonthlyBudget,
    semantic_type: SemanticType::NullableNumber { min: 0.0 },
    default: DefaultValue::Null,
    description: "Monthly spend limit (null = unlimited)",
};

static BUDGET_WARNING_PERCENT: FieldDescriptor = FieldDescriptor {
    key: SettingKey::BudgetWarningPercent,
    semantic_type: SemanticType::BoundedNumber {
        min: 1.0,
        max: 100.0,
    },
    default: DefaultValue::Number(80.0),
    description: "Budget percentage that triggers a warning",
};

static AUTO_APPROVED_COMMANDS: FieldDescriptor = FieldDescriptor {
    key: SettingKey::AutoApprovedCommands,
    semantic_type: SemanticType::StringArray,
    default: DefaultValue::TextList(&[]),
    description: "Commands agents may run without confirmation",
};

static ENVIRONMENT_PASSTHROUGH: FieldDescriptor = FieldDescriptor {
    key: SettingKey::EnvironmentPassthrough,
    semantic_type: SemanticType::StringArray,
    default: DefaultValue::TextList(&["PATH", "HOME", "LANG"]),
    description: "Environment variables forwarded into sessions",
};

static TELEMETRY_ENABLED: FieldDescriptor = FieldDescriptor {
    key: SettingKey::TelemetryEnabled,
    semantic_type: SemanticType::Boolean,
    default: DefaultValue::Bool(false),
    description: "Anonymous usage reporting",
};

static MAX_SESSIONS: FieldDescriptor = FieldDescriptor {
    key: SettingKey::MaxSessions,
    semantic_type: SemanticType::BoundedNumber {
        min: 1.0,
        max: 32.0,
    },
    default: DefaultValue::Number(8.0),
    description: "Maximum concurrently open sessions",
};

// =============================================================================
// ERRORS
// =============================================================================

/// Schema lookup and input-validation failures.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The name is not a registered field.
    UnknownField {
        /// Trimmed name that failed lookup.
        name: String,
    },
    /// The value does not satisfy the field's semantic type.
    InvalidValue {
        /// Field being validated.
        field: SettingKey,
        /// Description of the accepted shape.
        expected: String,
    },
}

impl SchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnknownField { .. } => ErrorCode::unknown_field(),
            Self::InvalidValue { .. } => ErrorCode::invalid_value(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField { name } => write!(formatter, "unknown setting: {name}"),
            Self::InvalidValue { field, expected } => {
                write!(formatter, "invalid value for {field}: expected {expected}")
            },
        }
    }
}

impl std::error::Error for SchemaError {}

impl From<SchemaError> for ErrorEnvelope {
    fn from(error: SchemaError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());
        match error {
            SchemaError::UnknownField { name } => envelope.with_metadata("field", name),
            SchemaError::InvalidValue { field, expected } => envelope
                .with_metadata("field", field.as_str())
                .with_metadata("expected", expected),
        }
    }
}
