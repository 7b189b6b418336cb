//! Raw settings maps for common load scenarios.

use serde_json::{Value, json};
use settings_domain::{CURRENT_SETTINGS_VERSION, SETTINGS_VERSION_KEY, SettingsSnapshot};
use settings_ports::RawSettings;

/// Build a raw map from a JSON object literal.
///
/// Non-object values yield an empty map.
pub fn raw(value: Value) -> RawSettings {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        _ => RawSettings::new(),
    }
}

/// Every field at its default, stamped with the current version marker.
pub fn current_defaults() -> RawSettings {
    let mut raw = SettingsSnapshot::defaults().to_raw();
    raw.insert(
        SETTINGS_VERSION_KEY.to_owned(),
        json!(CURRENT_SETTINGS_VERSION),
    );
    raw
}

/// A fully valid, customized map at the current version.
pub fn customized() -> RawSettings {
    let mut raw = current_defaults();
    raw.extend(self::raw(json!({
        "theme": "nord",
        "fontSize": 16,
        "lineHeight": 1.4,
        "dailyBudget": 5,
        "autoApprovedCommands": ["git status", "ls"],
    })));
    raw
}

/// A current-version map with one out-of-range field.
pub fn corrupted_font_size() -> RawSettings {
    RawSettings::from([
        ("fontSize".to_owned(), json!(50)),
        (
            SETTINGS_VERSION_KEY.to_owned(),
            json!(CURRENT_SETTINGS_VERSION),
        ),
    ])
}

/// A map carrying only a stale version marker.
pub fn stale_marker_only() -> RawSettings {
    RawSettings::from([(SETTINGS_VERSION_KEY.to_owned(), json!(1))])
}

/// Both budgets mistyped.
pub fn corrupted_budgets() -> RawSettings {
    raw(json!({ "dailyBudget": -100, "monthlyBudget": "x" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use settings_domain::{reconcile, stored_version};

    #[test]
    fn fixtures_have_expected_shape() {
        assert!(reconcile(&customized()).rejected.is_empty());
        assert_eq!(stored_version(&customized()), CURRENT_SETTINGS_VERSION);
        assert_eq!(reconcile(&corrupted_font_size()).rejected.len(), 1);
        assert_eq!(stored_version(&stale_marker_only()), 1);
        assert_eq!(reconcile(&corrupted_budgets()).rejected.len(), 2);
        assert!(raw(json!([1, 2])).is_empty());
    }
}
