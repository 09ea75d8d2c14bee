//! In-memory object store for tests and local development.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::signer::UrlSigner;
use crate::store::{ObjectBody, ObjectStore};

/// Keyed blob storage backed by a `HashMap`. Presigned URLs are HMAC
/// signed and served back through the API's `/assets/{key}` route.
pub struct MemoryStore {
    objects: RwLock<HashMap<String, ObjectBody>>,
    signer: Arc<UrlSigner>,
}

impl MemoryStore {
    pub fn new(signer: Arc<UrlSigner>) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            signer,
        }
    }

    /// Number of stored blobs. Test helper.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether the store holds no blobs. Test helper.
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl ObjectStore for MemoryStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let body = ObjectBody {
            bytes,
            content_type: content_type.to_string(),
        };
        self.objects.write().await.insert(key.to_string(), body);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<ObjectBody>, StorageError> {
        Ok(self.objects.read().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        // Removing an absent key is a success per the gateway contract.
        self.objects.write().await.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.objects.read().await.contains_key(key))
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut keys: Vec<String> = self
            .objects
            .read()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String, StorageError> {
        Ok(self.signer.issue(key, ttl))
    }
}
