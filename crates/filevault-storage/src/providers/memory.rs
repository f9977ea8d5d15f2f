//! In-memory object store.
//!
//! Objects live in a map for the lifetime of the process. Used for local
//! development (`storage.provider = "memory"`) and in tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use filevault_core::error::AppError;
use filevault_core::result::AppResult;
use filevault_core::traits::object_store::{ByteStream, ObjectStore};

/// Object store backed by a shared in-memory map.
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<BTreeMap<String, Bytes>>>,
}

impl MemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All keys currently stored, in order.
    pub async fn keys(&self) -> Vec<String> {
        self.objects.read().await.keys().cloned().collect()
    }

    /// Whether the store holds no objects.
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn read(&self, path: &str) -> AppResult<ByteStream> {
        let data = self.read_bytes(path).await?;
        Ok(Box::pin(futures::stream::once(async move { Ok(data) })))
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        self.objects
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Object not found: {path}")))
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        self.objects.write().await.insert(path.to_string(), data);
        Ok(())
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.objects
            .write()
            .await
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Object not found: {path}")))
    }

    async fn remove_many(&self, paths: &[String]) -> AppResult<()> {
        let mut objects = self.objects.write().await;
        let missing: Vec<&str> = paths
            .iter()
            .filter(|p| objects.remove(p.as_str()).is_none())
            .map(String::as_str)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::not_found(format!(
                "Objects not found: {}",
                missing.join(", ")
            )))
        }
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(self.objects.read().await.contains_key(path))
    }
}
