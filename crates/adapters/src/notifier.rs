//! Notifier adapters.

use crate::log_sink::LineSink;
use serde_json::Value;
use settings_ports::{LogFields, LoggerPort, Notification, NotificationLevel, NotifierPort};
use std::sync::Arc;

/// Console rendering of notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleFormat {
    /// `[level] Title: message`.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Notifier that writes one line per notification.
#[derive(Clone)]
pub struct ConsoleNotifier {
    sink: Arc<dyn LineSink>,
    format: ConsoleFormat,
}

impl ConsoleNotifier {
    /// Create a notifier writing to the given sink.
    #[must_use]
    pub fn new(sink: Arc<dyn LineSink>, format: ConsoleFormat) -> Self {
        Self { sink, format }
    }

    fn render(&self, notification: &Notification) -> String {
        match self.format {
            ConsoleFormat::Text => format!(
                "[{}] {}: {}\n",
                notification.level, notification.title, notification.message
            ),
            ConsoleFormat::Json => serde_json::to_string(notification).map_or_else(
                |_| format!("{{\"level\":\"{}\"}}\n", notification.level),
                |mut encoded| {
                    encoded.push('\n');
                    encoded
                },
            ),
        }
    }
}

impl NotifierPort for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        self.sink.write_line(&self.render(&notification));
    }
}

impl std::fmt::Debug for ConsoleNotifier {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ConsoleNotifier")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// Notifier that forwards notifications as `notification.<level>` log events.
#[derive(Clone)]
pub struct LoggingNotifier {
    logger: Arc<dyn LoggerPort>,
}

impl LoggingNotifier {
    /// Wrap a logger.
    #[must_use]
    pub fn new(logger: Arc<dyn LoggerPort>) -> Self {
        Self { logger }
    }
}

impl NotifierPort for LoggingNotifier {
    fn notify(&self, notification: Notification) {
        let mut fields = LogFields::new();
        fields.insert(
            "title".to_owned().into_boxed_str(),
            Value::String(notification.title.to_string()),
        );
        let event = format!("notification.{}", notification.level);
        match notification.level {
            NotificationLevel::Success => {
                self.logger.info(&event, &notification.message, Some(fields));
            },
            NotificationLevel::Warning => {
                self.logger.warn(&event, &notification.message, Some(fields));
            },
            NotificationLevel::Error => {
                self.logger.error(&event, &notification.message, Some(fields));
            },
        }
    }
}

/// Notifier that drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl NotifierPort for SilentNotifier {
    fn notify(&self, _notification: Notification) {}
}
