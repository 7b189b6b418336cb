//! User notification boundary contract.

use serde::Serialize;
use std::fmt;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// An operation completed.
    Success,
    /// Something needs attention but was handled.
    Warning,
    /// An operation failed.
    Error,
}

impl NotificationLevel {
    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Short title.
    pub title: Box<str>,
    /// Message body.
    pub message: Box<str>,
}

impl Notification {
    /// Build a notification.
    #[must_use]
    pub fn new(level: NotificationLevel, title: &str, message: &str) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Boundary contract for user notifications.
///
/// Fire-and-forget: implementations must not fail the caller.
pub trait NotifierPort: Send + Sync {
    /// Deliver a notification.
    fn notify(&self, notification: Notification);

    /// Convenience: success notification.
    fn success(&self, message: &str, title: &str) {
        self.notify(Notification::new(NotificationLevel::Success, title, message));
    }

    /// Convenience: warning notification.
    fn warning(&self, message: &str, title: &str) {
        self.notify(Notification::new(NotificationLevel::Warning, title, message));
    }

    /// Convenience: error notification.
    fn error(&self, message: &str, title: &str) {
        self.notify(Notification::new(NotificationLevel::Error, title, message));
    }
}
