//! The persisted-state protocol.

use async_trait::async_trait;

use crate::error::StateError;

/// Key-value persistence for application state.
///
/// Values are JSON. Implementations:
/// - `MemoryStore` (`gemmatalk-state-memory`): tests, ephemeral use
/// - `FsStore` (`gemmatalk-state-fs`): one file per key
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read a value by key. Returns `None` if the key doesn't exist.
    async fn read(&self, key: &str) -> Result<Option<serde_json::Value>, StateError>;

    /// Write a value. Creates or overwrites.
    async fn write(&self, key: &str, value: serde_json::Value) -> Result<(), StateError>;

    /// Delete a value. No-op if the key doesn't exist.
    async fn delete(&self, key: &str) -> Result<(), StateError>;

    /// List keys starting with `prefix`, sorted.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StateError>;
}
