//! Durable and ephemeral key/value storage.

mod file_storage;
mod memory_storage;

pub use file_storage::{APP_DIR_NAME, FileKeyValueStorage, STORAGE_FILE_NAME};
pub use memory_storage::MemoryKeyValueStorage;
