//! Object store selection from configuration.

use std::sync::Arc;

use tracing::info;

use filevault_core::config::StorageConfig;
use filevault_core::error::AppError;
use filevault_core::result::AppResult;
use filevault_core::traits::object_store::ObjectStore;

use crate::providers::{LocalObjectStore, MemoryObjectStore};

/// Build the object store named by `storage.provider`.
pub async fn build_object_store(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match config.provider.as_str() {
        "local" => Arc::new(LocalObjectStore::new(&config.local.root_path).await?),
        "memory" => Arc::new(MemoryObjectStore::new()),
        other => {
            return Err(AppError::configuration(format!(
                "Unknown storage provider '{other}' (expected \"local\" or \"memory\")"
            )));
        }
    };

    info!(provider = store.provider_type(), "Object store initialized");
    Ok(store)
}
