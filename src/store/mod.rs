//! Persistent counter storage.
//!
//! The store is the only replica with cross-process authority. Everything
//! else (embedded widget, home-screen widget) is a cache that gets corrected
//! from here.

mod file;
mod memory;
mod service;
mod value;

use std::path::PathBuf;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use service::StoreService;
pub use value::{CounterValue, DataIntegrityFault};

/// Errors raised by a store backend. Backends never retry.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Failed to read store '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write store '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to lock store '{path}': {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse store '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize store document: {source}")]
    Serialize {
        #[source]
        source: toml::ser::Error,
    },

    #[error("Entry '{key}' is not an integer (found {found})")]
    InvalidEntry { key: String, found: String },

    #[error("Store operation interrupted: {reason}")]
    Interrupted { reason: String },
}

/// Durable key-value namespace holding raw integers.
///
/// Implementations are synchronous and must make `write` atomic: a reader
/// sees either the previous value or the new one, never a partial write.
pub trait CounterStore: Send + Sync + 'static {
    /// Read the raw value under `key`. `Ok(None)` when the key was never set.
    fn read(&self, key: &str) -> Result<Option<i64>, StoreError>;

    /// Replace the value under `key`.
    fn write(&self, key: &str, value: i64) -> Result<(), StoreError>;
}
