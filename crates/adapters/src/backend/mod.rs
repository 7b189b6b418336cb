//! Persistence backends.

mod error;
mod json_file;
mod memory;
mod sqlite;

pub use error::BackendStoreError;
pub use json_file::JsonFileBackend;
pub use memory::InMemoryBackend;
pub use sqlite::SqliteBackend;
