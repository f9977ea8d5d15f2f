//! Catalog traits for the `folders` and `files` tables.

use async_trait::async_trait;
use uuid::Uuid;

use filevault_core::result::AppResult;
use filevault_entity::file::{CreateFile, FileRecord};
use filevault_entity::folder::{CreateFolder, Folder};

/// Access to the `folders` table.
///
/// `parent` arguments use `None` for the root level.
#[async_trait]
pub trait FolderStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a folder by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>>;

    /// List direct children of `parent`, ordered by name.
    async fn find_children(&self, parent: Option<Uuid>) -> AppResult<Vec<Folder>>;

    /// Count direct children of a folder.
    async fn count_children(&self, folder_id: Uuid) -> AppResult<u64>;

    /// Insert a folder. A sibling with the same owner and name is a `Conflict`.
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Rename a folder. Missing folder is `NotFound`, duplicate name `Conflict`.
    async fn rename(&self, folder_id: Uuid, new_name: &str) -> AppResult<Folder>;

    /// Delete one folder row. Returns `false` when no row matched.
    async fn delete(&self, folder_id: Uuid) -> AppResult<bool>;
}

/// Access to the `files` table.
#[async_trait]
pub trait FileStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a file by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileRecord>>;

    /// List files directly inside `folder`, newest first.
    async fn find_by_folder(&self, folder: Option<Uuid>) -> AppResult<Vec<FileRecord>>;

    /// Insert a file record. A duplicate storage path is a `Conflict`.
    async fn create(&self, data: &CreateFile) -> AppResult<FileRecord>;

    /// Delete one file row. Returns `false` when no row matched.
    async fn delete(&self, file_id: Uuid) -> AppResult<bool>;

    /// Delete many file rows in one statement. Returns the number deleted.
    async fn delete_many(&self, file_ids: &[Uuid]) -> AppResult<u64>;

    /// Point-update `folder_id` for the given files. Returns the number moved.
    async fn move_to_folder(&self, file_ids: &[Uuid], folder: Option<Uuid>) -> AppResult<u64>;

    /// Sum of `size_bytes` over all files.
    async fn total_size(&self) -> AppResult<u64>;
}
