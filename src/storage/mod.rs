//! This module provides the local key-value storage the todo list and its reminders are persisted to
//!
//! Every key holds a single serialized blob, that is always read and written wholesale.

use std::error::Error;

mod memory;
pub use memory::MemoryStorage;
mod folder;
pub use folder::FolderStorage;

/// A process-wide key-value store
///
/// Implementors must be shareable between the todo store and the reminder timers, hence the `&self` receivers.
pub trait KeyValueStore: Send + Sync {
    /// Returns the blob stored under `key`, or `None` if there is none
    fn get(&self, key: &str) -> Result<Option<String>, Box<dyn Error>>;
    /// Replaces the blob stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>>;
    /// Removes the blob stored under `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), Box<dyn Error>>;
}

/// Serialize `value` to JSON and store it under `key`
pub fn save_json<T: serde::Serialize + ?Sized>(storage: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), Box<dyn Error>> {
    let content = serde_json::to_string(value)?;
    storage.set(key, &content)
}

/// Load and deserialize the JSON blob stored under `key`
pub fn load_json<T: serde::de::DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> Result<Option<T>, Box<dyn Error>> {
    match storage.get(key)? {
        None => Ok(None),
        Some(content) => Ok(Some(serde_json::from_str(&content)?)),
    }
}
