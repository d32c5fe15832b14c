//! Durable key/value storage port.

use async_trait::async_trait;

use crate::error::StorageError;

/// Port for the client's durable local key/value storage.
///
/// Values are strings; callers own their encoding. Implementations may fail
/// for any reason (quota, disabled storage, I/O) and report it as a
/// [`StorageError`].
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Reads a value. Returns `Ok(None)` if the key is not set.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a value, replacing any previous one.
    ///
    /// # Errors
    /// Returns an error if the value cannot be persisted.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes a value. Removing a missing key is not an error.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be updated.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
