//! Storage layer for SkyGarden.
//!
//! Two independent seams live here:
//!
//! 1. [`Storage`]: the durable client-local key/value store that keeps a
//!    session alive across reloads. Implementations: [`MemoryStorage`],
//!    [`FileStorage`], and the [`ScopedStorage`] wrapper that gives each
//!    client its own key namespace.
//! 2. [`RecordBackend`]: a table-oriented CRUD backend (list/get/insert/
//!    update/delete by table name) with a typed [`Table`] accessor. The
//!    mock-authenticated flow never touches it; it's the swappable remote
//!    store a production deployment would plug in.
//!
//! Keys are restricted to ASCII letters, digits, `-`, `_` and `.` (not
//! leading), so a key is always a safe file name.

mod error;
mod file;
mod memory;
mod records;
mod scoped;

pub use error::{RecordError, StorageError, TableError};
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use records::{MemoryRecordBackend, RecordBackend, Table};
pub use scoped::ScopedStorage;

use std::future::Future;
use std::sync::Arc;

/// Longest key any backend accepts.
pub const MAX_KEY_LEN: usize = 128;

/// A durable string key/value store.
///
/// Mirrors what a browser gives a page through local storage: values are
/// plain text, absent keys read as `None`, and removing an absent key is
/// not an error.
///
/// `Send + Sync + 'static` so a store can sit behind an `Arc` shared by
/// connection tasks.
pub trait Storage: Send + Sync + 'static {
    /// Reads the value stored under `key`.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Deletes `key`. Succeeds if the key was already absent.
    fn remove(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

impl<S: Storage> Storage for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.as_ref().get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.as_ref().set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.as_ref().remove(key).await
    }
}

/// Checks that `key` is usable by every backend.
///
/// # Errors
/// Returns [`StorageError::InvalidKey`] for empty or over-long keys, keys
/// starting with `.`, or any character outside `[A-Za-z0-9_.-]`.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
