//! User-facing notification titles and messages.

use settings_domain::SettingKey;

/// Title of the load-failure notification.
pub const LOAD_FAILURE_TITLE: &str = "Settings Unavailable";
/// Title of the corruption-recovered notification.
pub const RECOVERED_TITLE: &str = "Settings Recovered";
/// Title of the update-failure notification.
pub const UPDATE_FAILURE_TITLE: &str = "Setting Not Saved";
/// Title of the reset-success notification.
pub const RESET_TITLE: &str = "Settings Reset";
/// Body of the reset-success notification.
pub const RESET_MESSAGE: &str = "All settings have been restored to their defaults.";
/// Title of the partial-reset notification.
pub const PARTIAL_RESET_TITLE: &str = "Partial Reset";
/// Title of the reconciliation-failure notification.
pub const RELOAD_FAILED_TITLE: &str = "Settings Error";
/// Body of the reconciliation-failure notification.
pub const RELOAD_FAILED_MESSAGE: &str =
    "Settings could not be reloaded after a partial reset. Please try again.";

const SAMPLE_SIZE: usize = 3;

/// Comma-separated field names, truncated to a short sample.
///
/// `theme, fontSize, lineHeight, and 2 more`
#[must_use]
pub fn field_sample(keys: &[SettingKey]) -> String {
    let shown: Vec<&str> = keys
        .iter()
        .take(SAMPLE_SIZE)
        .map(|key| key.as_str())
        .collect();
    let mut sample = shown.join(", ");
    let remaining = keys.len().saturating_sub(SAMPLE_SIZE);
    if remaining > 0 {
        sample.push_str(&format!(", and {remaining} more"));
    }
    sample
}

/// Body of the load-failure notification.
#[must_use]
pub fn load_failure_message(cause: &str) -> String {
    format!("Could not load settings, using defaults: {cause}")
}

/// Body of the corruption-recovered notification.
#[must_use]
pub fn corruption_message(recovered: &[SettingKey]) -> String {
    format!(
        "{} settings were corrupted and have been reset to defaults: {}",
        recovered.len(),
        field_sample(recovered)
    )
}

/// Body of the update-failure notification.
#[must_use]
pub fn update_failure_message(key: SettingKey, cause: &str) -> String {
    format!("Could not save {key}: {cause}")
}

/// Error text recorded after a partial reset.
#[must_use]
pub fn partial_reset_message(failed: &[SettingKey], total: usize) -> String {
    format!(
        "Failed to reset {} of {total} settings: {}",
        failed.len(),
        field_sample(failed)
    )
}
