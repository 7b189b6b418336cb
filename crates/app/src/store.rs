//! The settings store: owner of the snapshot, recovery record, and status.
//!
//! All state lives in one `watch` channel. Operations mutate it through
//! `send_modify` between backend calls and never hold a borrow across an
//! `await`, so UI collaborators can observe every transition through
//! [`SettingsStore::subscribe`] without being able to mutate anything.

use serde_json::Value;
use settings_domain::{SettingKey, SettingValue, SettingsSnapshot, SettingsState};
use settings_ports::{BackendInfo, LoggerPort, NotifierPort, SettingsBackendPort};
use settings_shared::{ErrorCode, ErrorEnvelope, Result};
use std::sync::Arc;
use tokio::sync::watch;

/// Dependencies required by the settings store.
#[derive(Clone)]
pub struct SettingsStoreDeps {
    /// Persistence backend.
    pub backend: Arc<dyn SettingsBackendPort>,
    /// User notifier.
    pub notifier: Arc<dyn NotifierPort>,
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

/// Explicit state container for persisted settings.
pub struct SettingsStore {
    pub(crate) deps: SettingsStoreDeps,
    state: watch::Sender<SettingsState>,
}

impl SettingsStore {
    /// Create an unloaded store holding defaults.
    #[must_use]
    pub fn new(deps: SettingsStoreDeps) -> Self {
        Self {
            deps,
            state: watch::Sender::new(SettingsState::default()),
        }
    }

    /// Clone of the full observable state.
    #[must_use]
    pub fn state(&self) -> SettingsState {
        self.state.borrow().clone()
    }

    /// Clone of the current snapshot.
    #[must_use]
    pub fn settings(&self) -> SettingsSnapshot {
        self.state.borrow().settings.clone()
    }

    /// Current value of one field.
    #[must_use]
    pub fn get(&self, key: SettingKey) -> SettingValue {
        self.state.borrow().settings.get(key).clone()
    }

    /// Whether a load cycle has completed.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.state.borrow().status.is_loaded
    }

    /// Whether an update or reset is in flight.
    #[must_use]
    pub fn is_updating(&self) -> bool {
        self.state.borrow().status.is_updating
    }

    /// Cause of the most recent failed operation.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.borrow().status.error.clone()
    }

    /// Fields recovered during the latest load or reset cycle.
    #[must_use]
    pub fn recovered_fields(&self) -> Vec<SettingKey> {
        self.state.borrow().recovered_fields.clone()
    }

    /// Read-only view that observes every state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SettingsState> {
        self.state.subscribe()
    }

    /// Description of the wired backend.
    #[must_use]
    pub fn backend_info(&self) -> &BackendInfo {
        self.deps.backend.describe()
    }

    /// Clear the recorded error. Idempotent.
    pub fn clear_error(&self) {
        self.modify(|state| state.status.error = None);
    }

    pub(crate) fn modify(&self, change: impl FnOnce(&mut SettingsState)) {
        self.state.send_modify(change);
    }

    /// Write one raw value, treating a declined write as a failure.
    pub(crate) async fn persist(&self, name: &str, value: Value) -> Result<()> {
        if self.deps.backend.set_setting(name, value).await? {
            Ok(())
        } else {
            Err(ErrorEnvelope::expected(
                ErrorCode::persistence_failed(),
                format!("backend declined write for '{name}'"),
            )
            .with_metadata("field", name))
        }
    }

    pub(crate) fn logger(&self) -> Option<&dyn LoggerPort> {
        self.deps.logger.as_deref()
    }

    pub(crate) fn notifier(&self) -> &dyn NotifierPort {
        self.deps.notifier.as_ref()
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SettingsStore")
            .field("backend", self.deps.backend.describe())
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use settings_testkit::{RecordingNotifier, ScriptedBackend};

    fn store(backend: ScriptedBackend) -> SettingsStore {
        SettingsStore::new(SettingsStoreDeps {
            backend: Arc::new(backend),
            notifier: Arc::new(RecordingNotifier::default()),
            logger: None,
        })
    }

    #[test]
    fn new_store_is_unloaded_with_defaults() {
        let store = store(ScriptedBackend::new());
        assert!(!store.is_loaded());
        assert!(!store.is_updating());
        assert_eq!(store.error(), None);
        assert!(store.recovered_fields().is_empty());
        assert_eq!(store.settings(), SettingsSnapshot::defaults());
    }

    #[test]
    fn clear_error_is_idempotent() {
        let store = store(ScriptedBackend::new());
        store.modify(|state| state.status.error = Some("boom".to_owned()));
        store.clear_error();
        store.clear_error();
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn declined_writes_become_errors() {
        let store = store(ScriptedBackend::new().decline_writes_for("theme"));
        let error = store.persist("theme", Value::from("nord")).await.err();
        assert_eq!(
            error.as_ref().map(ErrorEnvelope::user_message),
            Some("backend declined write for 'theme'")
        );
        assert_eq!(
            error.map(|error| error.code),
            Some(ErrorCode::persistence_failed())
        );
    }

    #[tokio::test]
    async fn subscribers_observe_changes() {
        let store = store(ScriptedBackend::new());
        let mut receiver = store.subscribe();
        store.modify(|state| state.status.is_loaded = true);
        assert!(receiver.has_changed().unwrap_or(false));
        assert!(receiver.borrow_and_update().status.is_loaded);
    }
}
