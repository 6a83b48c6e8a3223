//! Key-value store trait abstraction.
//!
//! Persisted local state (session token, login, response cache) goes through
//! this trait so tests can swap the file-backed store for an in-memory one.
//! Implementations are synchronous; async callers move the work onto the
//! blocking pool.

use thiserror::Error;

/// Key-value store errors.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Failed to read the backing storage
    #[error("Failed to read store: {0}")]
    ReadFailed(String),
    /// Failed to write the backing storage
    #[error("Failed to write store: {0}")]
    WriteFailed(String),
    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Trait for string key-value storage.
///
/// # Example
///
/// ```ignore
/// use classbook::traits::KeyValueStore;
///
/// store.put("token", "T1")?;
/// assert_eq!(store.get("token")?, Some("T1".to_string()));
/// store.remove("token")?;
/// ```
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// List every key starting with `prefix`.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// Remove every key starting with `prefix`, returning how many were removed.
    fn remove_prefix(&self, prefix: &str) -> Result<usize, StoreError> {
        let keys = self.keys_with_prefix(prefix)?;
        for key in &keys {
            self.remove(key)?;
        }
        Ok(keys.len())
    }
}
