//! Failure-isolated access to a single persisted preference.
//!
//! Every operation swallows storage and encoding failures after logging them,
//! so a broken or disabled storage backend degrades to "preference unset"
//! instead of reaching the session controller.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ports::KeyValueStorage;

/// Storage key of the "stay signed in" preference.
pub const PERSIST_KEY: &str = "persist";

/// A JSON-encoded value stored under one key.
pub struct PersistedPreference<T> {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    _value: PhantomData<fn() -> T>,
}

impl<T> Clone for PersistedPreference<T> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            key: self.key.clone(),
            _value: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for PersistedPreference<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedPreference")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl<T: Serialize + DeserializeOwned> PersistedPreference<T> {
    /// Binds a preference to a storage key.
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            _value: PhantomData,
        }
    }

    /// The storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stores a value.
    pub async fn write(&self, value: &T) {
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "failed to encode preference");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(&self.key, &encoded).await {
            tracing::error!(key = %self.key, error = %e, "failed to write preference");
        }
    }

    /// Reads the value, or `None` if it is unset, empty or unreadable.
    pub async fn read(&self) -> Option<T> {
        let raw = match self.storage.get_item(&self.key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "failed to read preference");
                return None;
            }
        };

        if raw.is_empty() {
            return None;
        }

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "stored preference is not valid JSON");
                None
            }
        }
    }

    /// Removes the value.
    pub async fn remove(&self) {
        if let Err(e) = self.storage.remove_item(&self.key).await {
            tracing::error!(key = %self.key, error = %e, "failed to remove preference");
        }
    }
}
