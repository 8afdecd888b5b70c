//! Durable string key/value storage.
//!
//! The cart store only needs "get a string by key" and "set a string by key".
//! [`PersistentStore`] captures exactly that, so the store can be backed by
//! a file on disk in production and by [`MemoryStore`] in tests.
//!
//! # Backends
//!
//! - [`FileStore`] - JSON object file, rewritten atomically on every write
//! - [`MemoryStore`] - shared in-process map, clones see each other's writes

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Default storage quota in bytes (the common browser `localStorage` limit).
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// A synchronous, string-keyed durable store.
///
/// All methods take `&self`; implementations use interior mutability or go
/// straight to their backing medium.
pub trait PersistentStore {
    /// The error type returned by storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Retrieve a value by key.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Insert or overwrite a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be stored, including when it
    /// would exceed the store's quota.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// Errors from the bundled storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a JSON object of strings.
    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The write would push the store past its size limit.
    #[error("storage quota exceeded: {attempted} bytes (limit {limit})")]
    QuotaExceeded {
        /// Configured limit in bytes.
        limit: usize,
        /// Size the store would have had after the write.
        attempted: usize,
    },
}
