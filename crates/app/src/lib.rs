//! # settings-app
//!
//! The settings store and its use cases: load (with migration and
//! corruption recovery), single-field update, and full reset.
//! This crate depends on `ports`, `domain`, and `shared`.

pub mod load_settings;
mod log_fields;
pub mod messages;
pub mod reset_settings;
pub mod store;
pub mod update_setting;

pub use store::{SettingsStore, SettingsStoreDeps};

/// Returns the app crate version.
#[must_use]
pub const fn app_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
