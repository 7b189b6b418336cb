//! Integration coverage for the schema registry, validation, and migrations.

use serde_json::json;
use settings_domain::{
    CURRENT_SETTINGS_VERSION, RawSettings, SETTINGS_VERSION_KEY, SchemaError, SettingKey,
    SettingValue, SettingsSnapshot, apply_migrations, descriptor_by_name, migrations_to_apply,
    reconcile, stored_version, validate_input,
};
use settings_shared::ErrorEnvelope;

fn raw(entries: serde_json::Value) -> RawSettings {
    serde_json::from_value(entries).unwrap_or_default()
}

#[test]
fn schema_errors_map_into_error_envelopes() -> Result<(), SchemaError> {
    let Err(error) = descriptor_by_name("fontColour") else {
        return Err(SchemaError::UnknownField {
            name: "fontColour".to_string(),
        });
    };

    let envelope: ErrorEnvelope = error.into();
    assert_eq!(envelope.code.namespace(), "settings");
    assert_eq!(envelope.code.code(), "unknown_field");
    assert_eq!(
        envelope.metadata.get("field"),
        Some(&"fontColour".to_string())
    );

    let Err(value_error) = validate_input(SettingKey::Theme, &json!("sepia")) else {
        return Err(SchemaError::UnknownField {
            name: "theme".to_string(),
        });
    };

    let envelope: ErrorEnvelope = value_error.into();
    assert_eq!(envelope.code.code(), "invalid_value");
    assert_eq!(envelope.metadata.get("field"), Some(&"theme".to_string()));
    assert!(envelope.message.contains("one of dark | light"));

    Ok(())
}

#[test]
fn migrated_raw_map_reconciles_cleanly() {
    let stored = raw(json!({
        "theme": "solarized",
        "cursorStyle": "beam",
        "fontSize": 18,
    }));
    assert_eq!(stored_version(&stored), 1);

    let outcome = apply_migrations(
        stored,
        &migrations_to_apply(1, CURRENT_SETTINGS_VERSION),
    );
    assert_eq!(
        outcome.raw.get(SETTINGS_VERSION_KEY),
        Some(&json!(CURRENT_SETTINGS_VERSION))
    );

    let reconciliation = reconcile(&outcome.raw);
    assert!(reconciliation.rejected.is_empty());
    assert_eq!(
        reconciliation.snapshot.get(SettingKey::FontSize),
        &SettingValue::Number(18.0)
    );
    assert_eq!(reconciliation.snapshot.theme(), "dark");
}

#[test]
fn budgets_share_a_null_default() {
    let reconciliation = reconcile(&raw(json!({
        "dailyBudget": -100,
        "monthlyBudget": "x",
    })));

    assert_eq!(
        reconciliation.rejected,
        vec![SettingKey::DailyBudget, SettingKey::MonthlyBudget]
    );
    assert_eq!(reconciliation.snapshot.daily_budget(), None);
    assert_eq!(reconciliation.snapshot.monthly_budget(), None);
}

#[test]
fn snapshot_round_trips_through_raw_form() {
    let mut snapshot = SettingsSnapshot::defaults();
    snapshot.set(SettingKey::LineHeight, SettingValue::Number(1.5));
    snapshot.set(
        SettingKey::AutoApprovedCommands,
        SettingValue::from(vec!["git status".to_string()]),
    );

    let reconciliation = reconcile(&snapshot.to_raw());
    assert!(reconciliation.rejected.is_empty());
    assert_eq!(reconciliation.snapshot, snapshot);
}
