//! In-memory adapter implementations for port contracts.
//!
//! These implementations are intended for:
//! - Unit/integration tests of the settings store
//! - Deterministic fault injection (failing writes by call count or key)
//! - Asserting on emitted notifications and log events

use serde_json::Value;
use settings_ports::{
    BackendInfo, BoxFuture, LogEvent, LogLevel, LoggerPort, Notification, NotificationLevel,
    NotifierPort, RawSettings, SettingsBackendPort,
};
use settings_shared::{ErrorClass, ErrorCode, ErrorEnvelope, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, PoisonError};
use tokio::sync::RwLock;

/// A no-op logger implementation.
#[derive(Debug, Default)]
pub struct NoopLogger;

impl LoggerPort for NoopLogger {
    fn log(&self, _event: LogEvent) {}
}

/// Logger that keeps every event for later assertions.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl RecordingLogger {
    /// Snapshot of recorded events.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded event names, in emission order.
    pub fn event_names(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .map(|event| event.event.into_string())
            .collect()
    }

    /// Number of events with the given name.
    pub fn count(&self, event: &str) -> usize {
        self.events()
            .iter()
            .filter(|recorded| recorded.event.as_ref() == event)
            .count()
    }

    /// Number of events at the given level.
    pub fn count_level(&self, level: LogLevel) -> usize {
        self.events()
            .iter()
            .filter(|recorded| recorded.level == level)
            .count()
    }
}

impl LoggerPort for RecordingLogger {
    fn log(&self, event: LogEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Notifier that keeps every notification for later assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Snapshot of recorded notifications.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Notifications at the given level.
    pub fn at_level(&self, level: NotificationLevel) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(|notification| notification.level == level)
            .collect()
    }

    /// Recorded titles, in emission order.
    pub fn titles(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|notification| notification.title.into_string())
            .collect()
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl NotifierPort for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

/// Outcome of one recorded write attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The value was stored.
    Stored,
    /// The write failed with an error.
    Failed,
    /// The backend returned `Ok(false)`.
    Declined,
}

/// One write attempt, in call order.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRecord {
    /// 1-based call number across all writes.
    pub call: u64,
    /// Key written.
    pub name: String,
    /// Value written.
    pub value: Value,
    /// What happened.
    pub outcome: WriteOutcome,
}

#[derive(Debug, Default)]
struct Script {
    fail_every_nth_write: Option<u64>,
    failing_keys: BTreeMap<String, String>,
    declining_keys: BTreeSet<String>,
    fail_get_all_from_call: Option<(u64, String)>,
}

#[derive(Debug, Default)]
struct BackendState {
    data: RawSettings,
    write_calls: u64,
    get_all_calls: u64,
    writes: Vec<WriteRecord>,
}

/// In-memory backend with scripted failures.
///
/// Failures are decided by call count and key name only, so a sequential
/// caller sees the same failures on every run.
#[derive(Debug)]
pub struct ScriptedBackend {
    info: BackendInfo,
    script: Script,
    state: RwLock<BackendState>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedBackend {
    /// Create an empty backend that never fails.
    #[must_use]
    pub fn new() -> Self {
        Self {
            info: BackendInfo::new("scripted"),
            script: Script::default(),
            state: RwLock::new(BackendState::default()),
        }
    }

    /// Seed the stored raw map.
    #[must_use]
    pub fn with_data(self, data: RawSettings) -> Self {
        Self {
            state: RwLock::new(BackendState {
                data,
                ..BackendState::default()
            }),
            ..self
        }
    }

    /// Fail every `n`th write call (1-based, counted across all keys).
    #[must_use]
    pub fn fail_every_nth_write(mut self, n: u64) -> Self {
        self.script.fail_every_nth_write = Some(n.max(1));
        self
    }

    /// Fail every write to `name` with `message`.
    #[must_use]
    pub fn fail_writes_for(mut self, name: &str, message: &str) -> Self {
        self.script
            .failing_keys
            .insert(name.to_owned(), message.to_owned());
        self
    }

    /// Return `Ok(false)` for every write to `name`.
    #[must_use]
    pub fn decline_writes_for(mut self, name: &str) -> Self {
        self.script.declining_keys.insert(name.to_owned());
        self
    }

    /// Fail every `get_all_settings` call.
    #[must_use]
    pub fn fail_get_all(self, message: &str) -> Self {
        self.fail_get_all_from_call(1, message)
    }

    /// Fail `get_all_settings` from the `call`th call (1-based) onwards.
    #[must_use]
    pub fn fail_get_all_from_call(mut self, call: u64, message: &str) -> Self {
        self.script.fail_get_all_from_call = Some((call, message.to_owned()));
        self
    }

    /// Current stored raw map.
    pub async fn data(&self) -> RawSettings {
        self.state.read().await.data.clone()
    }

    /// Every write attempt, in call order.
    pub async fn writes(&self) -> Vec<WriteRecord> {
        self.state.read().await.writes.clone()
    }

    /// Write attempts for one key.
    pub async fn writes_for(&self, name: &str) -> Vec<WriteRecord> {
        self.writes()
            .await
            .into_iter()
            .filter(|record| record.name == name)
            .collect()
    }

    /// Keys whose write failed or was declined, in call order.
    pub async fn failed_keys(&self) -> Vec<String> {
        self.writes()
            .await
            .into_iter()
            .filter(|record| record.outcome != WriteOutcome::Stored)
            .map(|record| record.name)
            .collect()
    }

    /// Number of `get_all_settings` calls so far.
    pub async fn get_all_calls(&self) -> u64 {
        self.state.read().await.get_all_calls
    }

    fn write_outcome(&self, call: u64, name: &str) -> std::result::Result<WriteOutcome, String> {
        if let Some(message) = self.script.failing_keys.get(name) {
            return Err(message.clone());
        }
        if self
            .script
            .fail_every_nth_write
            .is_some_and(|n| call % n == 0)
        {
            return Err(format!("simulated write failure on call {call}"));
        }
        if self.script.declining_keys.contains(name) {
            return Ok(WriteOutcome::Declined);
        }
        Ok(WriteOutcome::Stored)
    }
}

fn simulated_error(message: String) -> ErrorEnvelope {
    ErrorEnvelope::unexpected(
        ErrorCode::persistence_failed(),
        message,
        ErrorClass::Retriable,
    )
}

impl SettingsBackendPort for ScriptedBackend {
    fn get_all_settings(&self) -> BoxFuture<'_, Result<RawSettings>> {
        Box::pin(async move {
            let mut state = self.state.write().await;
            state.get_all_calls += 1;
            let calls = state.get_all_calls;
            if let Some((_, message)) = self
                .script
                .fail_get_all_from_call
                .as_ref()
                .filter(|(from_call, _)| calls >= *from_call)
            {
                return Err(ErrorEnvelope::unexpected(
                    ErrorCode::backend_unavailable(),
                    message.clone(),
                    ErrorClass::Retriable,
                ));
            }
            Ok(state.data.clone())
        })
    }

    fn set_setting<'a>(&'a self, name: &'a str, value: Value) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            let mut state = self.state.write().await;
            state.write_calls += 1;
            let call = state.write_calls;
            let outcome = self.write_outcome(call, name);

            state.writes.push(WriteRecord {
                call,
                name: name.to_owned(),
                value: value.clone(),
                outcome: *outcome.as_ref().unwrap_or(&WriteOutcome::Failed),
            });

            match outcome {
                Ok(WriteOutcome::Stored) => {
                    state.data.insert(name.to_owned(), value);
                    Ok(true)
                },
                Ok(_) => Ok(false),
                Err(message) => Err(simulated_error(message)),
            }
        })
    }

    fn describe(&self) -> &BackendInfo {
        &self.info
    }
}
