//! # settings-ports
//!
//! Port traits for the settings-store hexagonal architecture.
//!
//! This crate defines the interfaces between the settings store and its
//! collaborators: the persistence backend, the user notifier, and the
//! structured logger. It depends only on `domain` and `shared`.

use std::future::Future;
use std::pin::Pin;

/// Boxed future used by port traits.
///
/// Boundary traits are I/O-bound, so the allocation is negligible next to the
/// work behind it.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod backend;
pub mod logger;
pub mod notifier;

pub use backend::*;
pub use logger::*;
pub use notifier::*;

// Re-export selected domain types used in port signatures, so adapter crates
// can implement ports without directly depending on `settings-domain`.
pub use settings_domain::RawSettings;
