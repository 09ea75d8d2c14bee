use std::time::Duration;

use crate::error::StorageError;

/// A blob read back from the store.
#[derive(Debug, Clone)]
pub struct ObjectBody {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Durable keyed blob storage.
///
/// Implementations must tolerate concurrent access with per-key atomic
/// put/delete semantics. `delete` is idempotent: deleting an absent key
/// is not an error.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store a blob under `key`. Callers must not create a registry
    /// row referencing a key whose put failed.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<(), StorageError>;

    /// Fetch a blob. `Ok(None)` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<ObjectBody>, StorageError>;

    /// Delete a blob. Succeeds when the key is already absent.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Whether a blob exists under `key`.
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// All keys under `prefix`. Used by the reconciliation sweep.
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Issue a fresh, short-lived read URL for `key`. Issuance is
    /// latency-bound; callers fan out concurrently across keys.
    async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String, StorageError>;
}
