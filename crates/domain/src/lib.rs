//! # settings-domain
//!
//! Schema registry, validator engine, and migration engine for persisted
//! settings.
//!
//! This crate contains the core settings model with no infrastructure dependencies:
//!
//! - **Schema** - `SettingKey`, `FieldDescriptor`, `SemanticType`
//! - **Values** - `SettingValue`, `RawSettings`
//! - **Validation** - `validate`, `reconcile`, `validate_input`
//! - **Migration** - `MigrationStep`, `migrations_to_apply`, `apply_migrations`
//! - **State** - `SettingsSnapshot`, `SettingsState`, `OperationStatus`
//!
//! ## Dependency Rules
//!
//! - Depends only on `shared` crate
//! - No infrastructure or adapter dependencies
//! - Pure domain logic with no I/O

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

// Re-export shared types for convenience
pub use settings_shared::shared_crate_version;

// =============================================================================
// DOMAIN MODULES
// =============================================================================

pub mod migration;
pub mod schema;
pub mod snapshot;
pub mod states;
pub mod validate;
pub mod value;

pub use migration::{
    CURRENT_SETTINGS_VERSION, INITIAL_SETTINGS_VERSION, MIGRATION_STEPS, MigrationOutcome,
    MigrationStep, SETTINGS_VERSION_KEY, apply_migrations, migrations_to_apply, plan_migrations,
    stored_version,
};
pub use schema::{
    BELL_STYLES, CURSOR_STYLES, DefaultValue, FieldDescriptor, SchemaError, SemanticType,
    SettingKey, THEME_IDS, all_field_names, descriptor_by_name, descriptor_for, descriptors,
};
pub use snapshot::SettingsSnapshot;
pub use states::{LoadOutcome, LoadReport, OperationStatus, SettingsState};
pub use validate::{Reconciliation, Validation, reconcile, validate, validate_input};
pub use value::{RawSettings, SettingValue};

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// =============================================================================
// TESTS
// =============================================================================
