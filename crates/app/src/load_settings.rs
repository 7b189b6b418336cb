//! Load, migrate, and reconcile stored settings.

use crate::log_fields::{
    log_fields_completed, log_fields_error, log_fields_keys, log_fields_migration,
    log_fields_operation,
};
use crate::messages::{
    LOAD_FAILURE_TITLE, RECOVERED_TITLE, corruption_message, load_failure_message,
};
use crate::store::SettingsStore;
use serde_json::Value;
use settings_domain::{
    CURRENT_SETTINGS_VERSION, LoadOutcome, LoadReport, MigrationOutcome, Reconciliation,
    SETTINGS_VERSION_KEY, SettingKey, SettingsSnapshot, apply_migrations, migrations_to_apply,
    reconcile, stored_version,
};
use settings_shared::CorrelationId;
use std::time::Instant;

/// Why a load cycle runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadMode {
    /// Requested by a caller; surfaces notifications.
    Requested,
    /// Reconciliation after a partial reset; the reset reports the outcome.
    Reconcile,
}

impl SettingsStore {
    /// Load settings from the backend.
    ///
    /// Never fails: on any backend error the snapshot falls back to defaults
    /// and the failure is recorded in `error`. The returned report may be
    /// ignored.
    #[tracing::instrument(name = "settings.load", skip_all)]
    pub async fn load_settings(&self) -> LoadReport {
        let operation = CorrelationId::new_operation_id();
        self.run_load(&operation, LoadMode::Requested).await
    }

    pub(crate) async fn run_load(&self, operation: &CorrelationId, mode: LoadMode) -> LoadReport {
        let started_at = Instant::now();
        if let Some(logger) = self.logger() {
            logger.info(
                "settings.load.start",
                "Settings load started",
                Some(log_fields_operation(operation)),
            );
        }

        self.modify(|state| {
            state.status.error = None;
            state.recovered_fields.clear();
        });

        let raw = match self.deps.backend.get_all_settings().await {
            Ok(raw) => raw,
            Err(error) => {
                let cause = error.user_message().to_owned();
                self.modify(|state| {
                    state.settings = SettingsSnapshot::defaults();
                    state.recovered_fields = SettingKey::ALL.to_vec();
                    state.status.error = Some(cause.clone());
                    state.status.is_loaded = true;
                });
                if let Some(logger) = self.logger() {
                    logger.error(
                        "settings.load.failed",
                        "Settings could not be read; using defaults",
                        Some(log_fields_error(operation, None, &error)),
                    );
                }
                if mode == LoadMode::Requested {
                    self.notifier()
                        .error(&load_failure_message(&cause), LOAD_FAILURE_TITLE);
                }
                return LoadReport {
                    outcome: LoadOutcome::Failed,
                    migrated_from: None,
                    recovered_fields: SettingKey::ALL.to_vec(),
                };
            },
        };

        let from_version = stored_version(&raw);
        let steps = migrations_to_apply(from_version, CURRENT_SETTINGS_VERSION);
        let migration_mode = !steps.is_empty();
        let raw = if migration_mode {
            let outcome = apply_migrations(raw, &steps);
            self.persist_migration(operation, from_version, &outcome).await;
            outcome.raw
        } else {
            raw
        };

        let Reconciliation { snapshot, rejected } = reconcile(&raw);
        self.modify(|state| {
            state.settings = snapshot;
            for key in &rejected {
                state.mark_recovered(*key);
            }
        });
        self.persist_recovered(operation, &rejected).await;

        if !rejected.is_empty() {
            if let Some(logger) = self.logger() {
                logger.warn(
                    "settings.load.recovered",
                    "Invalid stored settings were reset to defaults",
                    Some(log_fields_keys(operation, "recoveredFields", &rejected)),
                );
            }
            if !migration_mode && mode == LoadMode::Requested {
                self.notifier()
                    .warning(&corruption_message(&rejected), RECOVERED_TITLE);
            }
        }

        self.modify(|state| state.status.is_loaded = true);

        if let Some(logger) = self.logger() {
            logger.info(
                "settings.load.completed",
                "Settings load completed",
                Some(log_fields_completed(operation, started_at)),
            );
        }

        let outcome = if migration_mode {
            LoadOutcome::Migrated
        } else if rejected.is_empty() {
            LoadOutcome::Clean
        } else {
            LoadOutcome::Recovered
        };
        LoadReport {
            outcome,
            migrated_from: migration_mode.then_some(from_version),
            recovered_fields: rejected,
        }
    }

    /// Persist migrated defaults, then the advanced version marker.
    ///
    /// Failures are logged and swallowed; a stale marker makes the next load
    /// retry the migration.
    async fn persist_migration(
        &self,
        operation: &CorrelationId,
        from_version: u32,
        outcome: &MigrationOutcome,
    ) {
        let Some(reached_version) = outcome.reached_version else {
            return;
        };

        for key in &outcome.touched_fields {
            let value = outcome.raw.get(key.as_str()).cloned().unwrap_or(Value::Null);
            if let Err(error) = self.persist(key.as_str(), value).await {
                if let Some(logger) = self.logger() {
                    logger.warn(
                        "settings.migration.fieldWriteFailed",
                        "Migrated default could not be persisted",
                        Some(log_fields_error(operation, Some(key.as_str()), &error)),
                    );
                }
            }
        }

        match self
            .persist(SETTINGS_VERSION_KEY, Value::from(reached_version))
            .await
        {
            Ok(()) => {
                if let Some(logger) = self.logger() {
                    logger.info(
                        "settings.migration.applied",
                        "Settings schema migrated",
                        Some(log_fields_migration(
                            operation,
                            from_version,
                            reached_version,
                            &outcome.touched_fields,
                        )),
                    );
                }
            },
            Err(error) => {
                if let Some(logger) = self.logger() {
                    logger.warn(
                        "settings.migration.markerWriteFailed",
                        "Schema version marker could not be persisted",
                        Some(log_fields_error(
                            operation,
                            Some(SETTINGS_VERSION_KEY),
                            &error,
                        )),
                    );
                }
            },
        }
    }

    /// Re-persist defaults for rejected fields, sequentially and best-effort.
    async fn persist_recovered(&self, operation: &CorrelationId, rejected: &[SettingKey]) {
        for key in rejected {
            let default = key.descriptor().default_value().to_json();
            if let Err(error) = self.persist(key.as_str(), default).await {
                if let Some(logger) = self.logger() {
                    logger.warn(
                        "settings.recovery.persistFailed",
                        "Recovered default could not be persisted",
                        Some(log_fields_error(operation, Some(key.as_str()), &error)),
                    );
                }
            }
        }
    }
}
