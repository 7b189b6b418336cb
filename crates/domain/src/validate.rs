//! Validator engine.
//!
//! One total function per semantic type. Validation never fails: a value is
//! either accepted in canonical form or rejected in favor of the field
//! default.

use crate::schema::{FieldDescriptor, SchemaError, SemanticType, SettingKey};
use crate::snapshot::SettingsSnapshot;
use crate::value::{RawSettings, SettingValue};
use serde_json::Value;

/// Outcome of validating one raw value.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// The raw value satisfies the semantic type.
    Accepted(SettingValue),
    /// The raw value was rejected; carries the field default.
    Rejected(SettingValue),
}

impl Validation {
    /// Value the snapshot should hold after validation.
    #[must_use]
    pub fn into_value(self) -> SettingValue {
        match self {
            Self::Accepted(value) | Self::Rejected(value) => value,
        }
    }

    /// Returns true when the raw value was replaced by the default.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Validate a raw stored value against a field descriptor.
#[must_use]
pub fn validate(descriptor: &FieldDescriptor, raw: &Value) -> Validation {
    canonicalize(&descriptor.semantic_type, raw)
        .map_or_else(|| Validation::Rejected(descriptor.default_value()), Validation::Accepted)
}

fn canonicalize(semantic_type: &SemanticType, raw: &Value) -> Option<SettingValue> {
    match (semantic_type, raw) {
        (SemanticType::Enum { members }, Value::String(text))
            if members.contains(&text.as_str()) =>
        {
            Some(SettingValue::Text(text.clone()))
        },
        (SemanticType::BoundedNumber { min, max }, Value::Number(number)) => number
            .as_f64()
            .filter(|value| value.is_finite() && *min <= *value && *value <= *max)
            .map(SettingValue::Number),
        (SemanticType::NullableNumber { .. }, Value::Null) => Some(SettingValue::Null),
        (SemanticType::NullableNumber { min }, Value::Number(number)) => number
            .as_f64()
            .filter(|value| value.is_finite() && *value >= *min)
            .map(SettingValue::Number),
        (SemanticType::Boolean, Value::Bool(flag)) => Some(SettingValue::Bool(*flag)),
        (SemanticType::StringArray, Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_owned))
            .collect::<Option<Vec<_>>>()
            .map(SettingValue::TextList),
        (SemanticType::FreeString, Value::String(text)) => Some(SettingValue::Text(text.clone())),
        _ => None,
    }
}

/// Strict validation for caller-supplied input.
///
/// Unlike [`validate`], a rejected value is reported instead of replaced.
pub fn validate_input(key: SettingKey, raw: &Value) -> Result<SettingValue, SchemaError> {
    let descriptor = key.descriptor();
    match validate(descriptor, raw) {
        Validation::Accepted(value) => Ok(value),
        Validation::Rejected(_) => Err(SchemaError::InvalidValue {
            field: key,
            expected: descriptor.semantic_type.describe(),
        }),
    }
}

/// Result of reconciling a raw map into a full snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Fully valid snapshot.
    pub snapshot: SettingsSnapshot,
    /// Fields whose stored value was rejected, in registry order.
    pub rejected: Vec<SettingKey>,
}

/// Validate every registered field of a raw map, in registry order.
///
/// Keys absent from the map resolve to their default without being reported
/// as rejected. Unknown keys are ignored.
#[must_use]
pub fn reconcile(raw: &RawSettings) -> Reconciliation {
    let mut snapshot = SettingsSnapshot::defaults();
    let mut rejected = Vec::new();

    for key in SettingKey::ALL {
        let Some(stored) = raw.get(key.as_str()) else {
            continue;
        };
        let validation = validate(key.descriptor(), stored);
        if validation.is_rejected() {
            rejected.push(key);
        }
        snapshot.set(key, validation.into_value());
    }

    Reconciliation { snapshot, rejected }
}
