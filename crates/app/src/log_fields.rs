//! Structured log field builders shared by the store operations.

use serde_json::Value;
use settings_domain::SettingKey;
use settings_ports::LogFields;
use settings_shared::{CorrelationId, ErrorEnvelope};
use std::time::Instant;

pub fn duration_ms(started_at: Instant) -> u64 {
    u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
}

pub fn log_fields_operation(operation: &CorrelationId) -> LogFields {
    let mut fields = LogFields::new();
    fields.insert(
        "operationId".to_owned().into_boxed_str(),
        Value::String(operation.as_str().to_owned()),
    );
    fields
}

pub fn log_fields_completed(operation: &CorrelationId, started_at: Instant) -> LogFields {
    let mut fields = log_fields_operation(operation);
    fields.insert(
        "durationMs".to_owned().into_boxed_str(),
        Value::from(duration_ms(started_at)),
    );
    fields
}

pub fn log_fields_keys(
    operation: &CorrelationId,
    name: &str,
    keys: &[SettingKey],
) -> LogFields {
    let mut fields = log_fields_operation(operation);
    fields.insert(
        name.to_owned().into_boxed_str(),
        Value::Array(
            keys.iter()
                .map(|key| Value::String(key.as_str().to_owned()))
                .collect(),
        ),
    );
    fields
}

pub fn log_fields_error(
    operation: &CorrelationId,
    field: Option<&str>,
    error: &ErrorEnvelope,
) -> LogFields {
    let mut fields = log_fields_operation(operation);
    if let Some(field) = field {
        fields.insert(
            "field".to_owned().into_boxed_str(),
            Value::String(field.to_owned()),
        );
    }
    fields.insert(
        "errorCode".to_owned().into_boxed_str(),
        Value::String(error.code.to_string()),
    );
    fields.insert(
        "errorMessage".to_owned().into_boxed_str(),
        Value::String(error.user_message().to_owned()),
    );
    fields
}

pub fn log_fields_migration(
    operation: &CorrelationId,
    from_version: u32,
    to_version: u32,
    touched: &[SettingKey],
) -> LogFields {
    let mut fields = log_fields_keys(operation, "touchedFields", touched);
    fields.insert(
        "fromVersion".to_owned().into_boxed_str(),
        Value::from(from_version),
    );
    fields.insert(
        "toVersion".to_owned().into_boxed_str(),
        Value::from(to_version),
    );
    fields
}
