//! Storage usage against the configured quota.

use std::sync::Arc;

use filevault_core::config::StorageConfig;
use filevault_core::error::AppError;
use filevault_database::store::FileStore;
use filevault_entity::storage::StorageUsage;

/// Reports how much of the storage quota is in use.
#[derive(Debug, Clone)]
pub struct UsageService {
    files: Arc<dyn FileStore>,
    quota_bytes: u64,
}

impl UsageService {
    /// Creates a new usage service.
    pub fn new(files: Arc<dyn FileStore>, config: &StorageConfig) -> Self {
        Self {
            files,
            quota_bytes: config.quota_bytes,
        }
    }

    /// Total bytes used by all files against the quota.
    pub async fn usage(&self) -> Result<StorageUsage, AppError> {
        let used = self.files.total_size().await?;
        Ok(StorageUsage::new(used, self.quota_bytes))
    }
}
