//! File record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata row describing an uploaded blob's location and ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FileRecord {
    /// Unique file identifier.
    pub id: Uuid,
    /// The original file name as uploaded.
    pub file_name: String,
    /// MIME type reported at upload time.
    pub file_type: Option<String>,
    /// Key of the blob in the object store.
    pub storage_path: String,
    /// Containing folder (null for root-level files).
    pub folder_id: Option<Uuid>,
    /// The user who uploaded the file.
    pub uploader_id: Uuid,
    /// Blob size in bytes.
    pub size_bytes: i64,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
}

impl FileRecord {
    /// Check if the given user uploaded this file.
    pub fn is_uploaded_by(&self, user_id: Uuid) -> bool {
        self.uploader_id == user_id
    }

    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.file_name)
            .map(|ext| ext.to_lowercase())
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The original file name.
    pub file_name: String,
    /// MIME type.
    pub file_type: Option<String>,
    /// Key of the already-written blob.
    pub storage_path: String,
    /// The folder to place the file in.
    pub folder_id: Option<Uuid>,
    /// The uploading user.
    pub uploader_id: Uuid,
    /// Blob size in bytes.
    pub size_bytes: i64,
}
