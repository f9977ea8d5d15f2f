//! File repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use filevault_core::error::{AppError, ErrorKind};
use filevault_core::result::AppResult;
use filevault_entity::file::{CreateFile, FileRecord};

use crate::store::FileStore;

/// Repository for file record CRUD and bulk operations.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for FileRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn find_by_folder(&self, folder: Option<Uuid>) -> AppResult<Vec<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(
            "SELECT * FROM files WHERE folder_id IS NOT DISTINCT FROM $1 \
             ORDER BY created_at DESC",
        )
        .bind(folder)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    async fn create(&self, data: &CreateFile) -> AppResult<FileRecord> {
        sqlx::query_as::<_, FileRecord>(
            "INSERT INTO files (file_name, file_type, storage_path, folder_id, uploader_id, size_bytes) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(&data.file_name)
        .bind(&data.file_type)
        .bind(&data.storage_path)
        .bind(data.folder_id)
        .bind(data.uploader_id)
        .bind(data.size_bytes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("Storage path '{}' already exists", data.storage_path))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create file", e),
        })
    }

    async fn delete(&self, file_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(file_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, file_ids: &[Uuid]) -> AppResult<u64> {
        if file_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM files WHERE id = ANY($1)")
            .bind(file_ids)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete files", e))?;
        Ok(result.rows_affected())
    }

    async fn move_to_folder(&self, file_ids: &[Uuid], folder: Option<Uuid>) -> AppResult<u64> {
        if file_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("UPDATE files SET folder_id = $2 WHERE id = ANY($1)")
            .bind(file_ids)
            .bind(folder)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to move files", e))?;
        Ok(result.rows_affected())
    }

    async fn total_size(&self) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(size_bytes), 0)::BIGINT FROM files")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to sum file sizes", e)
            })?;
        Ok(total.max(0) as u64)
    }
}
