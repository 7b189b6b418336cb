//! # settings-adapters
//!
//! Adapter implementations for the settings ports: persistence backends,
//! notifiers, and the `tracing` logger bridge.
//! This crate depends on `ports`, `domain`, and `shared`.

pub mod backend;
pub mod log_sink;
pub mod logger;
pub mod notifier;

pub use backend::{BackendStoreError, InMemoryBackend, JsonFileBackend, SqliteBackend};
pub use log_sink::{LineSink, StderrLineSink, WriterLineSink};
pub use logger::TracingLogger;
pub use notifier::{ConsoleFormat, ConsoleNotifier, LoggingNotifier, SilentNotifier};

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
