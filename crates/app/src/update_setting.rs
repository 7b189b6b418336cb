//! Persist a single field.

use crate::log_fields::{log_fields_error, log_fields_operation};
use crate::messages::{UPDATE_FAILURE_TITLE, update_failure_message};
use crate::store::SettingsStore;
use serde_json::Value;
use settings_domain::{SchemaError, SettingKey, SettingValue, validate_input};
use settings_shared::CorrelationId;

impl SettingsStore {
    /// Persist one field and update the snapshot on success.
    ///
    /// The value is trusted to already satisfy the field's semantic type.
    /// On failure the snapshot keeps its previous value, `error` records the
    /// cause, and `false` is returned.
    #[tracing::instrument(name = "settings.update", skip_all, fields(field = %key))]
    pub async fn update_setting(&self, key: SettingKey, value: SettingValue) -> bool {
        let operation = CorrelationId::new_operation_id();
        self.modify(|state| {
            state.status.is_updating = true;
            state.status.error = None;
        });

        let result = self.persist(key.as_str(), value.to_json()).await;
        match result {
            Ok(()) => {
                self.modify(|state| {
                    state.settings.set(key, value);
                    state.status.is_updating = false;
                });
                if let Some(logger) = self.logger() {
                    let mut fields = log_fields_operation(&operation);
                    fields.insert(
                        "field".to_owned().into_boxed_str(),
                        Value::String(key.as_str().to_owned()),
                    );
                    logger.debug("settings.update.completed", "Setting saved", Some(fields));
                }
                true
            },
            Err(error) => {
                let cause = error.user_message().to_owned();
                self.modify(|state| {
                    state.status.error = Some(cause.clone());
                    state.status.is_updating = false;
                });
                if let Some(logger) = self.logger() {
                    logger.error(
                        "settings.update.failed",
                        "Setting could not be saved",
                        Some(log_fields_error(&operation, Some(key.as_str()), &error)),
                    );
                }
                self.notifier()
                    .error(&update_failure_message(key, &cause), UPDATE_FAILURE_TITLE);
                false
            },
        }
    }

    /// Validate untrusted input, then persist it.
    ///
    /// Input errors are returned without touching the backend or the state.
    pub async fn update_from_input(&self, name: &str, raw: &Value) -> Result<bool, SchemaError> {
        let key = SettingKey::parse(name)?;
        let value = validate_input(key, raw)?;
        Ok(self.update_setting(key, value).await)
    }
}
