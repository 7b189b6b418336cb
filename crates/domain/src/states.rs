//! Observable settings state: snapshot, recovery record, operation status.

use crate::schema::SettingKey;
use crate::snapshot::SettingsSnapshot;
use serde::Serialize;

/// Lifecycle flags for load and mutation operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStatus {
    /// Flips to true once the first load cycle completes.
    pub is_loaded: bool,
    /// True while an update or reset is in flight.
    pub is_updating: bool,
    /// Human-readable cause of the most recent failed operation.
    pub error: Option<String>,
}

/// The single mutable unit owned by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsState {
    /// Always-valid settings.
    pub settings: SettingsSnapshot,
    /// Fields replaced by defaults during the latest load or reset cycle.
    pub recovered_fields: Vec<SettingKey>,
    /// Operation lifecycle.
    #[serde(flatten)]
    pub status: OperationStatus,
}

impl SettingsState {
    /// Record a recovered field, keeping the list free of duplicates.
    pub fn mark_recovered(&mut self, key: SettingKey) {
        if !self.recovered_fields.contains(&key) {
            self.recovered_fields.push(key);
        }
    }
}

/// How a load cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadOutcome {
    /// Stored data was valid as-is.
    Clean,
    /// Some fields were rejected and replaced by defaults.
    Recovered,
    /// Stored data was migrated to the current schema version.
    Migrated,
    /// The backend could not be read; defaults are in effect.
    Failed,
}

/// Summary of one load cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    /// How the cycle ended.
    pub outcome: LoadOutcome,
    /// Stored schema version, when migrations ran.
    pub migrated_from: Option<u32>,
    /// Fields recovered during this cycle.
    pub recovered_fields: Vec<SettingKey>,
}
