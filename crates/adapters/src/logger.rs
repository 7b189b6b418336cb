//! Bridge from structured log events to `tracing`.

use serde_json::Value;
use settings_ports::{LogEvent, LogFields, LogLevel, LoggerPort};

/// Logger that re-emits events through the `tracing` macros.
///
/// Event fields are flattened into one JSON string so they survive any
/// subscriber format.
#[derive(Debug, Clone, Copy)]
pub struct TracingLogger {
    min_level: LogLevel,
}

impl TracingLogger {
    /// Create a logger that forwards every level.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_level: LogLevel::Debug,
        }
    }

    /// Set the minimum forwarded level.
    #[must_use]
    pub const fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Whether an event at `level` is forwarded.
    #[must_use]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerPort for TracingLogger {
    fn log(&self, event: LogEvent) {
        if !self.enabled(event.level) {
            return;
        }

        let fields = event.fields.as_ref().map_or_else(String::new, fields_to_string);
        let name = event.event.as_ref();
        let message = event.message.as_ref();
        match event.level {
            LogLevel::Debug => tracing::debug!(event = name, fields = %fields, "{message}"),
            LogLevel::Info => tracing::info!(event = name, fields = %fields, "{message}"),
            LogLevel::Warn => tracing::warn!(event = name, fields = %fields, "{message}"),
            LogLevel::Error => tracing::error!(event = name, fields = %fields, "{message}"),
        }
    }
}

fn fields_to_string(fields: &LogFields) -> String {
    let map: serde_json::Map<String, Value> = fields
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect();
    Value::Object(map).to_string()
}
