//! Canonical setting values and the untyped raw map read from storage.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Untyped key/value map as returned by a persistence backend.
///
/// May be missing keys, carry legacy keys, or hold mistyped values.
pub type RawSettings = BTreeMap<String, Value>;

/// Largest integer magnitude an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A value that satisfies some field's semantic type.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    /// Boolean flag.
    Bool(bool),
    /// Finite number.
    Number(f64),
    /// Explicit absence (nullable numbers only).
    Null,
    /// String (enum member or free text).
    Text(String),
    /// Ordered list of strings.
    TextList(Vec<String>),
}

impl SettingValue {
    /// Convert into the JSON representation handed to backends.
    ///
    /// Integral numbers are emitted as JSON integers so that stored values
    /// read back the way users typed them (`14`, not `14.0`).
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(value) => Value::Bool(*value),
            Self::Number(value) => number_to_json(*value),
            Self::Null => Value::Null,
            Self::Text(value) => Value::String(value.clone()),
            Self::TextList(values) => {
                Value::Array(values.iter().cloned().map(Value::String).collect())
            },
        }
    }

    /// Boolean payload, if any.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric payload, if any.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// String payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// List payload, if any.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::TextList(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    /// Returns true for the explicit null value.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "guarded by fract() == 0 and the safe-integer bound"
)]
fn number_to_json(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        return Value::from(value as i64);
    }
    serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
}

impl Serialize for SettingValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.to_json())
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Option<f64>> for SettingValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Null, Self::Number)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for SettingValue {
    fn from(values: Vec<String>) -> Self {
        Self::TextList(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integral_numbers_serialize_as_integers() {
        assert_eq!(SettingValue::Number(14.0).to_json(), json!(14));
        assert_eq!(SettingValue::Number(1.2).to_json(), json!(1.2));
        assert_eq!(SettingValue::Number(-0.0).to_json(), json!(0));
    }

    #[test]
    fn accessors_match_variants() {
        assert_eq!(SettingValue::from(true).as_bool(), Some(true));
        assert_eq!(SettingValue::from("dark").as_str(), Some("dark"));
        assert_eq!(SettingValue::from(None).as_f64(), None);
        assert!(SettingValue::from(None).is_null());
        assert_eq!(
            SettingValue::from(vec!["PATH".to_owned()]).as_list(),
            Some(["PATH".to_owned()].as_slice())
        );
    }

    #[test]
    fn serialize_uses_json_shape() -> Result<(), serde_json::Error> {
        let value = SettingValue::TextList(vec!["git status".to_owned()]);
        assert_eq!(serde_json::to_value(&value)?, json!(["git status"]));
        assert_eq!(serde_json::to_value(SettingValue::Null)?, Value::Null);
        Ok(())
    }
}
