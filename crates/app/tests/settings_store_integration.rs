//! Integration tests for the settings store against scripted backends.

use serde_json::{Value, json};
use settings_app::messages::{
    LOAD_FAILURE_TITLE, PARTIAL_RESET_TITLE, RECOVERED_TITLE, RELOAD_FAILED_TITLE, RESET_TITLE,
    UPDATE_FAILURE_TITLE,
};
use settings_app::{SettingsStore, SettingsStoreDeps};
use settings_domain::{
    CURRENT_SETTINGS_VERSION, LoadOutcome, RawSettings, SETTINGS_VERSION_KEY, SettingKey,
    SettingValue, SettingsSnapshot, SettingsState,
};
use settings_ports::{BackendInfo, BoxFuture, NotificationLevel, SettingsBackendPort};
use settings_shared::Result;
use settings_testkit::fixtures;
use settings_testkit::{RecordingLogger, RecordingNotifier, ScriptedBackend, WriteOutcome};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tokio::sync::watch;

struct Harness {
    store: SettingsStore,
    backend: Arc<ScriptedBackend>,
    notifier: Arc<RecordingNotifier>,
    logger: Arc<RecordingLogger>,
}

fn harness(backend: ScriptedBackend) -> Harness {
    let backend = Arc::new(backend);
    let notifier = Arc::new(RecordingNotifier::default());
    let logger = Arc::new(RecordingLogger::default());
    let store = SettingsStore::new(SettingsStoreDeps {
        backend: backend.clone(),
        notifier: notifier.clone(),
        logger: Some(logger.clone()),
    });
    Harness {
        store,
        backend,
        notifier,
        logger,
    }
}

/// Status seen by the backend at the moment of one write.
#[derive(Debug, Clone, PartialEq)]
struct WriteStatus {
    name: String,
    is_updating: bool,
    error: Option<String>,
}

/// Wraps a scripted backend and samples the store state on every write.
struct ObservingBackend {
    inner: ScriptedBackend,
    state: OnceLock<watch::Receiver<SettingsState>>,
    seen: Mutex<Vec<WriteStatus>>,
}

impl ObservingBackend {
    fn new(inner: ScriptedBackend) -> Self {
        Self {
            inner,
            state: OnceLock::new(),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn observe(&self, receiver: watch::Receiver<SettingsState>) {
        let _ = self.state.set(receiver);
    }

    fn seen(&self) -> Vec<WriteStatus> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SettingsBackendPort for ObservingBackend {
    fn get_all_settings(&self) -> BoxFuture<'_, Result<RawSettings>> {
        self.inner.get_all_settings()
    }

    fn set_setting<'a>(&'a self, name: &'a str, value: Value) -> BoxFuture<'a, Result<bool>> {
        if let Some(receiver) = self.state.get() {
            let status = receiver.borrow().status.clone();
            self.seen
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(WriteStatus {
                    name: name.to_owned(),
                    is_updating: status.is_updating,
                    error: status.error,
                });
        }
        self.inner.set_setting(name, value)
    }

    fn describe(&self) -> &BackendInfo {
        self.inner.describe()
    }
}

async fn marker_writes(backend: &ScriptedBackend) -> usize {
    backend.writes_for(SETTINGS_VERSION_KEY).await.len()
}

#[tokio::test]
async fn reloading_valid_data_is_idempotent() {
    let h = harness(ScriptedBackend::new().with_data(fixtures::customized()));

    let first = h.store.load_settings().await;
    let first_snapshot = h.store.settings();
    let second = h.store.load_settings().await;

    assert_eq!(first.outcome, LoadOutcome::Clean);
    assert_eq!(second.outcome, LoadOutcome::Clean);
    assert_eq!(h.store.settings(), first_snapshot);
    assert!(h.store.recovered_fields().is_empty());
    assert_eq!(first_snapshot.theme(), "nord");
    assert!(h.backend.writes().await.is_empty());
    assert!(h.notifier.notifications().is_empty());
}

#[tokio::test]
async fn every_invalid_field_resolves_to_its_default() {
    let mut raw: RawSettings = SettingKey::ALL
        .into_iter()
        .map(|key| (key.as_str().to_owned(), json!({ "nested": true })))
        .collect();
    raw.insert(
        SETTINGS_VERSION_KEY.to_owned(),
        json!(CURRENT_SETTINGS_VERSION),
    );
    let h = harness(ScriptedBackend::new().with_data(raw));

    let report = h.store.load_settings().await;

    assert_eq!(report.outcome, LoadOutcome::Recovered);
    assert_eq!(h.store.settings(), SettingsSnapshot::defaults());
    assert_eq!(h.store.recovered_fields(), SettingKey::ALL.to_vec());
    assert_eq!(h.backend.writes().await.len(), SettingKey::COUNT);
    assert_eq!(
        h.backend.data().await.get("fontSize"),
        Some(&json!(14)),
        "recovered defaults are re-persisted"
    );
}

#[tokio::test]
async fn migration_writes_the_marker_once() {
    let h = harness(ScriptedBackend::new().with_data(fixtures::stale_marker_only()));

    let first = h.store.load_settings().await;
    assert_eq!(first.outcome, LoadOutcome::Migrated);
    assert_eq!(first.migrated_from, Some(1));
    assert_eq!(marker_writes(&h.backend).await, 1);

    let second = h.store.load_settings().await;
    assert_eq!(second.outcome, LoadOutcome::Clean);
    assert_eq!(marker_writes(&h.backend).await, 1);
    assert_eq!(h.logger.count("settings.migration.applied"), 1);
}

#[tokio::test]
async fn clean_reset_restores_defaults() {
    let h = harness(ScriptedBackend::new().with_data(fixtures::customized()));
    h.store.load_settings().await;

    assert!(h.store.reset_settings().await);

    assert_eq!(h.store.settings(), SettingsSnapshot::defaults());
    assert!(h.store.recovered_fields().is_empty());
    assert_eq!(h.store.error(), None);
    assert!(!h.store.is_updating());
    assert_eq!(h.notifier.titles(), vec![RESET_TITLE]);
    assert_eq!(
        h.notifier
            .at_level(NotificationLevel::Success)
            .first()
            .map(|notification| notification.message.to_string()),
        Some("All settings have been restored to their defaults.".to_owned())
    );
}

#[tokio::test]
async fn reset_with_every_fifth_write_failing_is_deterministic() {
    let mut raw = fixtures::customized();
    raw.insert("monthlyBudget".to_owned(), json!(300));
    let h = harness(
        ScriptedBackend::new()
            .with_data(raw)
            .fail_every_nth_write(5),
    );
    h.store.load_settings().await;

    assert!(!h.store.reset_settings().await);

    let expected = vec![
        SettingKey::CursorStyle,
        SettingKey::CopyOnSelect,
        SettingKey::MonthlyBudget,
        SettingKey::MaxSessions,
    ];
    assert_eq!(expected.len(), SettingKey::COUNT / 5);
    assert_eq!(h.store.recovered_fields(), expected);
    assert_eq!(
        h.store.error().as_deref(),
        Some("Failed to reset 4 of 20 settings: cursorStyle, copyOnSelect, monthlyBudget, and 1 more")
    );
    assert!(!h.store.is_updating());

    let snapshot = h.store.settings();
    assert_eq!(snapshot.theme(), "dark");
    assert_eq!(snapshot.monthly_budget(), Some(300.0));

    let warnings = h.notifier.at_level(NotificationLevel::Warning);
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings.first().map(|notification| notification.title.to_string()),
        Some(PARTIAL_RESET_TITLE.to_owned())
    );
    assert_eq!(h.logger.count("settings.reset.partial"), 1);
}

#[tokio::test]
async fn failed_update_keeps_the_previous_value() {
    let h = harness(
        ScriptedBackend::new()
            .with_data(fixtures::customized())
            .fail_writes_for("theme", "disk full"),
    );
    h.store.load_settings().await;

    let saved = h
        .store
        .update_setting(SettingKey::Theme, SettingValue::from("light"))
        .await;

    assert!(!saved);
    assert_eq!(h.store.settings().theme(), "nord");
    assert_eq!(h.store.error().as_deref(), Some("disk full"));
    assert!(!h.store.is_updating());

    let errors = h.notifier.at_level(NotificationLevel::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.first().map(|notification| (
            notification.title.to_string(),
            notification.message.to_string()
        )),
        Some((
            UPDATE_FAILURE_TITLE.to_owned(),
            "Could not save theme: disk full".to_owned()
        ))
    );
}

#[tokio::test]
async fn successful_update_changes_one_field() {
    let h = harness(ScriptedBackend::new().with_data(fixtures::current_defaults()));
    h.store.load_settings().await;

    assert!(
        h.store
            .update_setting(SettingKey::DailyBudget, SettingValue::Number(12.5))
            .await
    );

    assert_eq!(h.store.settings().daily_budget(), Some(12.5));
    assert_eq!(h.backend.data().await.get("dailyBudget"), Some(&json!(12.5)));
    assert_eq!(h.store.error(), None);
}

#[tokio::test]
async fn update_clears_the_previous_error() {
    let h = harness(ScriptedBackend::new().fail_writes_for("fontSize", "locked"));
    h.store.load_settings().await;

    assert!(
        !h.store
            .update_setting(SettingKey::FontSize, SettingValue::Number(20.0))
            .await
    );
    assert_eq!(h.store.error().as_deref(), Some("locked"));

    assert!(
        h.store
            .update_setting(SettingKey::FontFamily, SettingValue::from("Fira Code"))
            .await
    );
    assert_eq!(h.store.error(), None);
}

#[tokio::test]
async fn messageless_failures_read_as_unknown_error() {
    let h = harness(ScriptedBackend::new().fail_writes_for("bellStyle", "  "));

    let saved = h
        .store
        .update_setting(SettingKey::BellStyle, SettingValue::from("none"))
        .await;

    assert!(!saved);
    assert_eq!(h.store.error().as_deref(), Some("Unknown error"));
}

#[tokio::test]
async fn declined_writes_are_failures() {
    let h = harness(ScriptedBackend::new().decline_writes_for("theme"));

    let saved = h
        .store
        .update_setting(SettingKey::Theme, SettingValue::from("nord"))
        .await;

    assert!(!saved);
    assert_eq!(
        h.store.error().as_deref(),
        Some("backend declined write for 'theme'")
    );
    assert_eq!(h.store.settings().theme(), "dark");
}

#[tokio::test]
async fn update_from_input_rejects_before_writing() {
    let h = harness(ScriptedBackend::new());

    let unknown = h.store.update_from_input("fontColour", &json!(1)).await;
    assert!(unknown.is_err());

    let invalid = h.store.update_from_input("fontSize", &json!(99)).await;
    assert!(invalid.is_err());
    assert!(h.backend.writes().await.is_empty());

    let saved = h.store.update_from_input("fontSize", &json!(16)).await;
    assert_eq!(saved, Ok(true));
    assert!((h.store.settings().font_size() - 16.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn out_of_range_field_is_reported_as_corrupted() {
    let h = harness(ScriptedBackend::new().with_data(fixtures::corrupted_font_size()));

    let report = h.store.load_settings().await;

    assert_eq!(report.outcome, LoadOutcome::Recovered);
    assert!((h.store.settings().font_size() - 14.0).abs() < f64::EPSILON);
    assert!(h.store.recovered_fields().contains(&SettingKey::FontSize));

    let warnings = h.notifier.at_level(NotificationLevel::Warning);
    assert_eq!(warnings.len(), 1);
    let warning = warnings.first();
    assert_eq!(
        warning.map(|notification| notification.title.to_string()),
        Some(RECOVERED_TITLE.to_owned())
    );
    assert!(
        warning.is_some_and(|notification| notification
            .message
            .contains("settings were corrupted"))
    );
    assert_eq!(
        h.backend
            .writes_for("fontSize")
            .await
            .first()
            .map(|record| record.value.clone()),
        Some(json!(14))
    );
}

#[tokio::test]
async fn stale_marker_migrates_without_a_recovery_warning() {
    let h = harness(ScriptedBackend::new().with_data(fixtures::stale_marker_only()));

    h.store.load_settings().await;

    let marker = h.backend.writes_for(SETTINGS_VERSION_KEY).await;
    assert_eq!(marker.len(), 1);
    assert_eq!(
        marker.first().map(|record| record.value.clone()),
        Some(json!(CURRENT_SETTINGS_VERSION))
    );
    assert!(h.notifier.at_level(NotificationLevel::Warning).is_empty());
    assert!(h.store.is_loaded());
}

#[tokio::test]
async fn migration_suppresses_warning_even_with_rejected_fields() {
    let raw = fixtures::raw(json!({ "fontSize": 99, "theme": "solarized" }));
    let h = harness(ScriptedBackend::new().with_data(raw));

    let report = h.store.load_settings().await;

    assert_eq!(report.outcome, LoadOutcome::Migrated);
    assert_eq!(report.recovered_fields, vec![SettingKey::FontSize]);
    assert_eq!(h.store.settings().theme(), "dark");
    assert!(h.notifier.notifications().is_empty());
}

#[tokio::test]
async fn mistyped_budgets_without_marker_fall_back_to_null() {
    let h = harness(ScriptedBackend::new().with_data(fixtures::corrupted_budgets()));

    let report = h.store.load_settings().await;

    assert_eq!(report.outcome, LoadOutcome::Migrated);
    assert_eq!(report.migrated_from, Some(1));
    let snapshot = h.store.settings();
    assert_eq!(snapshot.daily_budget(), None);
    assert_eq!(snapshot.monthly_budget(), None);
    assert_eq!(
        h.store.recovered_fields(),
        vec![SettingKey::DailyBudget, SettingKey::MonthlyBudget]
    );
    assert!(h.notifier.at_level(NotificationLevel::Warning).is_empty());
    assert_eq!(
        h.backend.data().await.get("dailyBudget"),
        Some(&Value::Null)
    );
}

#[tokio::test]
async fn whole_number_float_marker_is_current() {
    let h = harness(ScriptedBackend::new().with_data(fixtures::raw(json!({
        "_settingsVersion": 3.0,
        "theme": "nord",
        "scrollbackLines": 5000,
    }))));

    let report = h.store.load_settings().await;

    assert_eq!(report.outcome, LoadOutcome::Clean);
    assert_eq!(report.migrated_from, None);
    assert_eq!(h.store.settings().theme(), "nord");
    assert_eq!(
        h.store.get(SettingKey::ScrollbackLines),
        SettingValue::from(5000.0)
    );
    assert!(h.backend.writes().await.is_empty());
}

#[tokio::test]
async fn writes_run_while_updating_with_the_error_cleared() {
    let backend = Arc::new(ObservingBackend::new(
        ScriptedBackend::new()
            .with_data(fixtures::current_defaults())
            .fail_writes_for("fontSize", "disk full"),
    ));
    let store = SettingsStore::new(SettingsStoreDeps {
        backend: backend.clone(),
        notifier: Arc::new(RecordingNotifier::default()),
        logger: None,
    });
    backend.observe(store.subscribe());
    store.load_settings().await;
    assert!(!store.is_updating());

    assert!(
        !store
            .update_setting(SettingKey::FontSize, SettingValue::from(16.0))
            .await
    );
    assert_eq!(store.error().as_deref(), Some("disk full"));
    assert!(!store.is_updating());

    assert!(
        store
            .update_setting(SettingKey::Theme, SettingValue::from("nord"))
            .await
    );
    assert_eq!(store.error(), None);
    assert!(!store.is_updating());

    store.update_setting(SettingKey::FontSize, SettingValue::from(18.0)).await;
    assert!(store.error().is_some());
    assert!(!store.reset_settings().await);
    assert!(!store.is_updating());

    let seen = backend.seen();
    assert_eq!(seen.len(), 3 + SettingKey::COUNT);
    assert_eq!(seen.first().map(|write| write.name.as_str()), Some("fontSize"));
    assert!(seen.iter().all(|write| write.is_updating));
    assert!(seen.iter().all(|write| write.error.is_none()));
}

#[tokio::test]
async fn mistyped_budgets_fall_back_to_null() {
    let h = harness(
        ScriptedBackend::new().with_data({
            let mut raw = fixtures::corrupted_budgets();
            raw.insert(
                SETTINGS_VERSION_KEY.to_owned(),
                json!(CURRENT_SETTINGS_VERSION),
            );
            raw
        }),
    );

    h.store.load_settings().await;

    let snapshot = h.store.settings();
    assert_eq!(snapshot.get(SettingKey::DailyBudget), &SettingValue::Null);
    assert_eq!(snapshot.get(SettingKey::MonthlyBudget), &SettingValue::Null);
    let recovered = h.store.recovered_fields();
    assert!(recovered.contains(&SettingKey::DailyBudget));
    assert!(recovered.contains(&SettingKey::MonthlyBudget));
}

#[tokio::test]
async fn unreachable_backend_falls_back_to_defaults() {
    let h = harness(ScriptedBackend::new().fail_get_all("connection refused"));

    let report = h.store.load_settings().await;

    assert_eq!(report.outcome, LoadOutcome::Failed);
    assert!(h.store.is_loaded());
    assert_eq!(h.store.settings(), SettingsSnapshot::defaults());
    assert_eq!(h.store.recovered_fields(), SettingKey::ALL.to_vec());
    assert_eq!(h.store.error().as_deref(), Some("connection refused"));
    assert_eq!(h.notifier.titles(), vec![LOAD_FAILURE_TITLE]);
    assert_eq!(h.logger.count("settings.load.failed"), 1);
}

#[tokio::test]
async fn failed_reconciliation_reload_adds_a_retry_notice() {
    let h = harness(
        ScriptedBackend::new()
            .with_data(fixtures::current_defaults())
            .fail_writes_for("fontSize", "locked")
            .fail_get_all_from_call(2, "connection reset"),
    );
    h.store.load_settings().await;

    assert!(!h.store.reset_settings().await);

    assert_eq!(
        h.notifier.titles(),
        vec![PARTIAL_RESET_TITLE, RELOAD_FAILED_TITLE]
    );
    assert_eq!(h.store.recovered_fields(), vec![SettingKey::FontSize]);
    assert_eq!(
        h.store.error().as_deref(),
        Some("Failed to reset 1 of 20 settings: fontSize")
    );
    assert!(!h.store.is_updating());
    assert_eq!(h.logger.count("settings.reset.reloadFailed"), 1);
}

#[tokio::test]
async fn marker_write_failure_is_swallowed_and_retried() {
    let h = harness(
        ScriptedBackend::new()
            .with_data(fixtures::stale_marker_only())
            .fail_writes_for(SETTINGS_VERSION_KEY, "read-only"),
    );

    let first = h.store.load_settings().await;
    assert_eq!(first.outcome, LoadOutcome::Migrated);
    assert_eq!(h.store.error(), None);
    assert!(h.notifier.notifications().is_empty());
    assert_eq!(h.logger.count("settings.migration.markerWriteFailed"), 1);

    let second = h.store.load_settings().await;
    assert_eq!(second.migrated_from, Some(1));
    assert_eq!(marker_writes(&h.backend).await, 2);
}

#[tokio::test]
async fn newer_marker_is_left_untouched() {
    let mut raw = fixtures::customized();
    raw.insert(SETTINGS_VERSION_KEY.to_owned(), json!(9));
    let h = harness(ScriptedBackend::new().with_data(raw));

    let report = h.store.load_settings().await;

    assert_eq!(report.outcome, LoadOutcome::Clean);
    assert!(h.backend.writes().await.is_empty());
    assert_eq!(h.store.settings().theme(), "nord");
}

#[tokio::test]
async fn recovery_writes_are_best_effort() {
    let h = harness(
        ScriptedBackend::new()
            .with_data(fixtures::corrupted_font_size())
            .fail_writes_for("fontSize", "locked"),
    );

    h.store.load_settings().await;

    assert_eq!(h.store.error(), None);
    assert!(h.store.is_loaded());
    assert_eq!(h.logger.count("settings.recovery.persistFailed"), 1);
    assert_eq!(
        h.backend
            .writes_for("fontSize")
            .await
            .first()
            .map(|record| record.outcome),
        Some(WriteOutcome::Failed)
    );
}

#[tokio::test]
async fn reset_clears_recovered_fields_from_load() {
    let h = harness(ScriptedBackend::new().with_data(fixtures::corrupted_font_size()));
    h.store.load_settings().await;
    assert_eq!(h.store.recovered_fields(), vec![SettingKey::FontSize]);

    assert!(h.store.reset_settings().await);
    assert!(h.store.recovered_fields().is_empty());
}

#[tokio::test]
async fn concurrent_update_and_reset_both_complete() {
    let h = harness(ScriptedBackend::new().with_data(fixtures::current_defaults()));
    h.store.load_settings().await;

    let (updated, reset) = tokio::join!(
        h.store
            .update_setting(SettingKey::Theme, SettingValue::from("nord")),
        h.store.reset_settings(),
    );

    assert!(updated);
    assert!(reset);
    assert!(!h.store.is_updating());
    assert_eq!(h.store.error(), None);
    assert_eq!(h.backend.writes().await.len(), SettingKey::COUNT + 1);
}

#[tokio::test]
async fn subscribers_see_the_loaded_state() {
    let h = harness(ScriptedBackend::new().with_data(fixtures::customized()));
    let mut receiver = h.store.subscribe();
    assert!(!receiver.borrow().status.is_loaded);

    h.store.load_settings().await;

    assert!(receiver.has_changed().unwrap_or(false));
    let state = receiver.borrow_and_update().clone();
    assert!(state.status.is_loaded);
    assert_eq!(state.settings.theme(), "nord");
}
