//! The always-valid settings snapshot.

use crate::schema::SettingKey;
use crate::value::{RawSettings, SettingValue};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A value for every registered field.
///
/// Construction starts from defaults and values are replaced one key at a
/// time, so a snapshot can never be missing a field.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSnapshot {
    values: [SettingValue; SettingKey::COUNT],
}

impl SettingsSnapshot {
    /// Snapshot holding every field default.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            values: SettingKey::ALL.map(|key| key.descriptor().default_value()),
        }
    }

    /// Current value of a field.
    #[must_use]
    #[expect(
        clippy::indexing_slicing,
        reason = "SettingKey::index is always below SettingKey::COUNT"
    )]
    pub fn get(&self, key: SettingKey) -> &SettingValue {
        &self.values[key.index()]
    }

    /// Replace the value of a field.
    #[expect(
        clippy::indexing_slicing,
        reason = "SettingKey::index is always below SettingKey::COUNT"
    )]
    pub fn set(&mut self, key: SettingKey, value: SettingValue) {
        self.values[key.index()] = value;
    }

    /// Iterate fields in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (SettingKey, &SettingValue)> {
        SettingKey::ALL.into_iter().zip(self.values.iter())
    }

    /// Render as a raw map, the shape a backend stores.
    #[must_use]
    pub fn to_raw(&self) -> RawSettings {
        self.iter()
            .map(|(key, value)| (key.as_str().to_owned(), value.to_json()))
            .collect()
    }

    /// Color theme identifier.
    #[must_use]
    pub fn theme(&self) -> &str {
        self.get(SettingKey::Theme).as_str().unwrap_or("dark")
    }

    /// Terminal font size.
    #[must_use]
    pub fn font_size(&self) -> f64 {
        self.get(SettingKey::FontSize).as_f64().unwrap_or(14.0)
    }

    /// Daily budget, `None` when unlimited.
    #[must_use]
    pub fn daily_budget(&self) -> Option<f64> {
        self.get(SettingKey::DailyBudget).as_f64()
    }

    /// Monthly budget, `None` when unlimited.
    #[must_use]
    pub fn monthly_budget(&self) -> Option<f64> {
        self.get(SettingKey::MonthlyBudget).as_f64()
    }

    /// Maximum concurrently open sessions.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the value is validated to lie in [1, 32]"
    )]
    pub fn max_sessions(&self) -> u32 {
        self.get(SettingKey::MaxSessions)
            .as_f64()
            .map_or(8, |value| value as u32)
    }

    /// Environment variables forwarded into sessions.
    #[must_use]
    pub fn environment_passthrough(&self) -> &[String] {
        self.get(SettingKey::EnvironmentPassthrough)
            .as_list()
            .unwrap_or_default()
    }
}

impl Default for SettingsSnapshot {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Serialize for SettingsSnapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(SettingKey::COUNT))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}
