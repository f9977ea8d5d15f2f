//! File upload, download and deletion.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use filevault_core::config::StorageConfig;
use filevault_core::error::AppError;
use filevault_core::traits::object_store::ObjectStore;
use filevault_database::store::{FileStore, FolderStore};
use filevault_entity::file::{CreateFile, FileRecord};

use super::naming::storage_path;
use crate::context::RequestContext;

/// Content type used when an upload did not report one.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A file to upload in one request.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Target folder (None for the root level).
    pub folder_id: Option<Uuid>,
    /// Original file name.
    pub file_name: String,
    /// MIME type.
    pub mime_type: Option<String>,
    /// File content.
    pub data: Bytes,
}

/// A downloaded file with its metadata.
#[derive(Debug, Clone)]
pub struct DownloadResult {
    /// File record.
    pub file: FileRecord,
    /// File content.
    pub data: Bytes,
    /// MIME type to present.
    pub content_type: String,
}

/// Manages file records and their blobs.
#[derive(Debug, Clone)]
pub struct FileService {
    /// Folder catalog.
    folders: Arc<dyn FolderStore>,
    /// File catalog.
    files: Arc<dyn FileStore>,
    /// Blob storage.
    objects: Arc<dyn ObjectStore>,
    /// Storage configuration.
    config: StorageConfig,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
        objects: Arc<dyn ObjectStore>,
        config: StorageConfig,
    ) -> Self {
        Self {
            folders,
            files,
            objects,
            config,
        }
    }

    /// Gets a file record by ID.
    pub async fn get_file(
        &self,
        _ctx: &RequestContext,
        file_id: Uuid,
    ) -> Result<FileRecord, AppError> {
        self.files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }

    /// Lists the files directly inside a folder, or at the root.
    pub async fn list_files(
        &self,
        _ctx: &RequestContext,
        folder_id: Option<Uuid>,
    ) -> Result<Vec<FileRecord>, AppError> {
        self.files.find_by_folder(folder_id).await
    }

    /// Stores a file's content and records it in the catalog.
    ///
    /// The blob is written first; if the row insert then fails the blob is
    /// removed again on a best-effort basis.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        req: UploadRequest,
    ) -> Result<FileRecord, AppError> {
        let uploader_id = ctx.require_user()?;

        if req.file_name.trim().is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }
        if req.data.len() as u64 > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }
        if let Some(folder_id) = req.folder_id {
            self.folders
                .find_by_id(folder_id)
                .await?
                .ok_or_else(|| AppError::not_found("Target folder not found"))?;
        }

        let key = storage_path(
            uploader_id,
            req.folder_id,
            Utc::now().timestamp_millis(),
            &req.file_name,
        );
        let size_bytes = req.data.len() as i64;
        self.objects.write(&key, req.data).await?;

        let record = CreateFile {
            file_name: req.file_name.trim().to_string(),
            file_type: req.mime_type,
            storage_path: key.clone(),
            folder_id: req.folder_id,
            uploader_id,
            size_bytes,
        };
        let file = match self.files.create(&record).await {
            Ok(file) => file,
            Err(e) => {
                if let Err(cleanup) = self.objects.delete(&key).await {
                    warn!(path = %key, error = %cleanup, "Failed to remove orphaned upload");
                }
                return Err(e);
            }
        };

        info!(
            user_id = %uploader_id,
            file_id = %file.id,
            path = %file.storage_path,
            size = file.size_bytes,
            "File uploaded"
        );
        Ok(file)
    }

    /// Reads a file's content.
    pub async fn download(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> Result<DownloadResult, AppError> {
        let file = self.get_file(ctx, file_id).await?;
        let data = self.objects.read_bytes(&file.storage_path).await?;
        let content_type = file
            .file_type
            .clone()
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        Ok(DownloadResult {
            file,
            data,
            content_type,
        })
    }

    /// Deletes one file: its blob first, then its row.
    ///
    /// Only the uploader may delete a file. A blob that is already gone is
    /// not an error.
    pub async fn delete_file(&self, ctx: &RequestContext, file_id: Uuid) -> Result<(), AppError> {
        let user_id = ctx.require_user()?;
        let file = self.get_file(ctx, file_id).await?;
        if !file.is_uploaded_by(user_id) {
            return Err(AppError::authentication(
                "Only the uploader can delete this file",
            ));
        }

        match self.objects.delete(&file.storage_path).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                debug!(path = %file.storage_path, "Blob already absent");
            }
            Err(e) => return Err(e),
        }

        self.files.delete(file_id).await?;
        info!(user_id = %user_id, file_id = %file_id, "File deleted");
        Ok(())
    }
}
