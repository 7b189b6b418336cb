//! Restore every field to its default.

use crate::load_settings::LoadMode;
use crate::log_fields::{log_fields_completed, log_fields_error, log_fields_keys};
use crate::messages::{
    PARTIAL_RESET_TITLE, RELOAD_FAILED_MESSAGE, RELOAD_FAILED_TITLE, RESET_MESSAGE, RESET_TITLE,
    partial_reset_message,
};
use crate::store::SettingsStore;
use settings_domain::{LoadOutcome, SettingKey, SettingsSnapshot};
use settings_shared::CorrelationId;
use std::time::Instant;

impl SettingsStore {
    /// Write every default, one field at a time in registry order.
    ///
    /// Returns `true` when every write succeeded. Otherwise the snapshot is
    /// reconciled by reloading from the backend, `recovered_fields` lists
    /// the fields that failed to reset, and `false` is returned.
    #[tracing::instrument(name = "settings.reset", skip_all)]
    pub async fn reset_settings(&self) -> bool {
        let operation = CorrelationId::new_operation_id();
        let started_at = Instant::now();
        self.modify(|state| {
            state.status.is_updating = true;
            state.status.error = None;
            state.recovered_fields.clear();
        });

        let mut failed = Vec::new();
        for key in SettingKey::ALL {
            let default = key.descriptor().default_value().to_json();
            if let Err(error) = self.persist(key.as_str(), default).await {
                if let Some(logger) = self.logger() {
                    logger.warn(
                        "settings.reset.fieldFailed",
                        "Default could not be persisted",
                        Some(log_fields_error(&operation, Some(key.as_str()), &error)),
                    );
                }
                failed.push(key);
            }
        }

        if failed.is_empty() {
            self.modify(|state| {
                state.settings = SettingsSnapshot::defaults();
                state.recovered_fields.clear();
                state.status.error = None;
                state.status.is_updating = false;
            });
            if let Some(logger) = self.logger() {
                logger.info(
                    "settings.reset.completed",
                    "Settings reset to defaults",
                    Some(log_fields_completed(&operation, started_at)),
                );
            }
            self.notifier().success(RESET_MESSAGE, RESET_TITLE);
            return true;
        }

        let message = partial_reset_message(&failed, SettingKey::COUNT);
        if let Some(logger) = self.logger() {
            logger.warn(
                "settings.reset.partial",
                &message,
                Some(log_fields_keys(&operation, "failedFields", &failed)),
            );
        }
        self.notifier().warning(&message, PARTIAL_RESET_TITLE);

        let reload = self.run_load(&operation, LoadMode::Reconcile).await;
        if reload.outcome == LoadOutcome::Failed {
            if let Some(logger) = self.logger() {
                logger.error(
                    "settings.reset.reloadFailed",
                    "Settings could not be reloaded after a partial reset",
                    Some(log_fields_keys(&operation, "failedFields", &failed)),
                );
            }
            self.notifier().error(RELOAD_FAILED_MESSAGE, RELOAD_FAILED_TITLE);
        }

        self.modify(|state| {
            state.recovered_fields = failed;
            state.status.error = Some(message);
            state.status.is_updating = false;
        });
        false
    }
}
