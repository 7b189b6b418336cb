//! Migration engine.
//!
//! Migrations are data: an ordered list of steps, each resetting a fixed set
//! of fields to their defaults. Applying a range folds over the steps between
//! the stored and current schema versions.

use crate::schema::SettingKey;
use crate::value::RawSettings;
use serde_json::Value;

/// Reserved raw-map key holding the stored schema version.
pub const SETTINGS_VERSION_KEY: &str = "_settingsVersion";

/// Schema version written by this build.
pub const CURRENT_SETTINGS_VERSION: u32 = 3;

/// Version assumed when the marker is absent or unreadable.
pub const INITIAL_SETTINGS_VERSION: u32 = 1;

/// One versioned migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStep {
    /// Version reached after applying the step.
    pub target_version: u32,
    /// Fields reset to their defaults.
    pub reset_fields: &'static [SettingKey],
}

/// Every migration step, in strictly increasing version order.
pub const MIGRATION_STEPS: &[MigrationStep] = &[
    MigrationStep {
        target_version: 2,
        reset_fields: &[SettingKey::Theme, SettingKey::CursorStyle],
    },
    MigrationStep {
        target_version: 3,
        reset_fields: &[SettingKey::ScrollbackLines, SettingKey::AutoApprovedCommands],
    },
];

/// Read the stored schema version from a raw map.
///
/// Whole-number floats such as `3.0` count as integers. A missing,
/// fractional, or out-of-range marker reads as version 1.
#[must_use]
pub fn stored_version(raw: &RawSettings) -> u32 {
    raw.get(SETTINGS_VERSION_KEY)
        .and_then(marker_as_u32)
        .filter(|version| *version >= INITIAL_SETTINGS_VERSION)
        .unwrap_or(INITIAL_SETTINGS_VERSION)
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "guarded by fract() == 0 and the u32 range check"
)]
fn marker_as_u32(value: &Value) -> Option<u32> {
    if let Some(version) = value.as_u64() {
        return u32::try_from(version).ok();
    }
    value
        .as_f64()
        .filter(|version| version.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(version))
        .map(|version| version as u32)
}

/// Steps that move `stored` up to `current`, in order.
///
/// Empty when `stored >= current`.
#[must_use]
pub fn migrations_to_apply(stored: u32, current: u32) -> Vec<MigrationStep> {
    plan_migrations(MIGRATION_STEPS, stored, current)
}

/// Select steps from an arbitrary step table.
#[must_use]
pub fn plan_migrations(steps: &[MigrationStep], stored: u32, current: u32) -> Vec<MigrationStep> {
    if stored >= current {
        return Vec::new();
    }
    steps
        .iter()
        .filter(|step| step.target_version > stored && step.target_version <= current)
        .copied()
        .collect()
}

/// Result of applying migration steps to a raw map.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationOutcome {
    /// Raw map with reset fields and the advanced marker.
    pub raw: RawSettings,
    /// Fields reset by any step, deduplicated, in first-touched order.
    pub touched_fields: Vec<SettingKey>,
    /// Version marker after the last step, if any step ran.
    pub reached_version: Option<u32>,
}

/// Apply steps in order to a raw map.
///
/// With no steps the map is returned unchanged and the marker untouched.
#[must_use]
pub fn apply_migrations(mut raw: RawSettings, steps: &[MigrationStep]) -> MigrationOutcome {
    let mut touched_fields = Vec::new();
    let mut reached_version = None;

    for step in steps {
        for key in step.reset_fields {
            raw.insert(
                key.as_str().to_owned(),
                key.descriptor().default_value().to_json(),
            );
            if !touched_fields.contains(key) {
                touched_fields.push(*key);
            }
        }
        raw.insert(
            SETTINGS_VERSION_KEY.to_owned(),
            Value::from(step.target_version),
        );
        reached_version = Some(step.target_version);
    }

    MigrationOutcome {
        raw,
        touched_fields,
        reached_version,
    }
}
