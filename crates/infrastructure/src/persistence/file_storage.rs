//! File-backed key/value storage.
//!
//! All keys live in one JSON object file, `storage.json`, in the storage
//! directory (by default the platform config directory):
//! - Linux: ~/.config/alumni-session/storage.json
//! - macOS: ~/Library/Application Support/alumni-session/storage.json
//! - Windows: %APPDATA%/alumni-session/storage.json
//!
//! ```json
//! {
//!   "persist": "true"
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use alumni_application::{KeyValueStorage, StorageError};
use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Directory name under the platform config directory.
pub const APP_DIR_NAME: &str = "alumni-session";

/// File name of the storage file.
pub const STORAGE_FILE_NAME: &str = "storage.json";

type Entries = BTreeMap<String, String>;

/// Key/value storage in a single JSON file.
#[derive(Debug)]
pub struct FileKeyValueStorage {
    path: PathBuf,
    // Serialises read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileKeyValueStorage {
    /// Creates storage in the given directory. Nothing is touched until the first write.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(STORAGE_FILE_NAME),
            write_lock: Mutex::new(()),
        }
    }

    /// Creates storage in the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the platform has no config directory.
    pub fn in_config_dir() -> Result<Self, StorageError> {
        Self::default_dir()
            .map(Self::new)
            .ok_or_else(|| {
                StorageError::Unavailable("no config directory on this platform".to_string())
            })
    }

    /// The platform default storage directory, if one exists.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR_NAME))
    }

    /// Path of the storage file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Entries, StorageError> {
        let content = match fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(StorageError::Io(e)),
        };

        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Entries::new());
        }

        from_json_bytes(&content).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Like `load`, but a corrupt file counts as empty so the next save
    /// replaces it. The flag reports whether the file was discarded.
    async fn load_for_write(&self) -> Result<(Entries, bool), StorageError> {
        match self.load().await {
            Err(StorageError::Serialization(e)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "discarding corrupt storage file"
                );
                Ok((Entries::new(), true))
            }
            other => other.map(|entries| (entries, false)),
        }
    }

    async fn save(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content =
            to_json_stable_bytes(entries).map_err(|e| StorageError::Serialization(e.to_string()))?;

        // Replace atomically.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorage for FileKeyValueStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load().await?.remove(key))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let (mut entries, _) = self.load_for_write().await?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries).await
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let (mut entries, discarded) = self.load_for_write().await?;
        if entries.remove(key).is_none() && !discarded {
            return Ok(());
        }
        self.save(&entries).await
    }
}
