//! Folder CRUD, listing and deletion entry points.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use filevault_core::error::AppError;
use filevault_database::store::{FileStore, FolderStore};
use filevault_entity::folder::{CreateFolder, Folder, FolderListing};

use super::delete::{DeletionReport, FolderTreeDeleter};
use super::preview::{DeletePolicy, DeletionPreview};
use crate::context::RequestContext;

/// Manages folder operations for the acting user.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Folder catalog.
    folders: Arc<dyn FolderStore>,
    /// File catalog.
    files: Arc<dyn FileStore>,
    /// Recursive deleter.
    deleter: FolderTreeDeleter,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
        deleter: FolderTreeDeleter,
    ) -> Self {
        Self {
            folders,
            files,
            deleter,
        }
    }

    /// Gets a folder by ID.
    pub async fn get_folder(
        &self,
        _ctx: &RequestContext,
        folder_id: Uuid,
    ) -> Result<Folder, AppError> {
        self.folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))
    }

    /// Returns the chain of folders from the root down to `folder_id`.
    pub async fn breadcrumb(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> Result<Vec<Folder>, AppError> {
        let mut chain = vec![self.get_folder(ctx, folder_id).await?];
        let mut seen = HashSet::from([folder_id]);

        while let Some(parent_id) = chain.last().and_then(|f| f.parent_folder_id) {
            if !seen.insert(parent_id) {
                return Err(AppError::internal(format!(
                    "Folder {parent_id} is its own ancestor"
                )));
            }
            match self.folders.find_by_id(parent_id).await? {
                Some(parent) => chain.push(parent),
                None => break,
            }
        }

        chain.reverse();
        Ok(chain)
    }

    /// Lists the folders and files directly under `folder_id`, or at the root.
    pub async fn list_contents(
        &self,
        ctx: &RequestContext,
        folder_id: Option<Uuid>,
    ) -> Result<FolderListing, AppError> {
        if let Some(id) = folder_id {
            self.get_folder(ctx, id).await?;
        }
        let folders = self.folders.find_children(folder_id).await?;
        let files = self.files.find_by_folder(folder_id).await?;
        Ok(FolderListing {
            folder_id,
            folders,
            files,
        })
    }

    /// Creates a folder owned by the acting user.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_folder_id: Option<Uuid>,
    ) -> Result<Folder, AppError> {
        let owner_id = ctx.require_user()?;
        let name = validate_name(name)?;

        if let Some(parent_id) = parent_folder_id {
            self.folders
                .find_by_id(parent_id)
                .await?
                .ok_or_else(|| AppError::not_found("Parent folder not found"))?;
        }

        let folder = self
            .folders
            .create(&CreateFolder {
                name,
                owner_id,
                parent_folder_id,
            })
            .await?;

        info!(
            user_id = %owner_id,
            folder_id = %folder.id,
            name = %folder.name,
            "Folder created"
        );
        Ok(folder)
    }

    /// Renames a folder.
    pub async fn rename_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        new_name: &str,
    ) -> Result<Folder, AppError> {
        let user_id = ctx.require_user()?;
        let name = validate_name(new_name)?;
        self.require_owner(user_id, folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        let folder = self.folders.rename(folder_id, &name).await?;
        info!(user_id = %user_id, folder_id = %folder_id, name = %folder.name, "Folder renamed");
        Ok(folder)
    }

    /// Describes what deleting `folder_id` would affect.
    pub async fn inspect_for_deletion(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> Result<DeletionPreview, AppError> {
        let folder = self.get_folder(ctx, folder_id).await?;
        let subfolder_count = self.folders.count_children(folder_id).await?;
        let files = self.files.find_by_folder(Some(folder_id)).await?;

        Ok(DeletionPreview {
            folder_id,
            name: folder.name,
            has_content: subfolder_count > 0 || !files.is_empty(),
            foreign_files: files.iter().any(|f| !f.is_uploaded_by(ctx.user_id)),
            subfolder_count,
            file_count: files.len() as u64,
        })
    }

    /// Moves every file in the subtree not uploaded by the acting user to the
    /// root level. Returns the number of files moved.
    pub async fn relocate_foreign_files(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> Result<u64, AppError> {
        let user_id = ctx.require_user()?;
        self.require_owner(user_id, folder_id).await?;
        let mut pending = vec![folder_id];
        let mut visited = HashSet::from([folder_id]);
        let mut moved = 0;

        while let Some(current) = pending.pop() {
            let foreign: Vec<Uuid> = self
                .files
                .find_by_folder(Some(current))
                .await?
                .into_iter()
                .filter(|f| !f.is_uploaded_by(user_id))
                .map(|f| f.id)
                .collect();
            if !foreign.is_empty() {
                moved += self.files.move_to_folder(&foreign, None).await?;
                debug!(folder_id = %current, files = foreign.len(), "Moved foreign files to root");
            }

            for child in self.folders.find_children(Some(current)).await? {
                if visited.insert(child.id) {
                    pending.push(child.id);
                }
            }
        }

        if moved > 0 {
            info!(
                user_id = %user_id,
                folder_id = %folder_id,
                moved,
                "Relocated other users' files"
            );
        }
        Ok(moved)
    }

    /// Deletes a folder subtree under the given policy.
    pub async fn delete_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        policy: DeletePolicy,
    ) -> Result<DeletionReport, AppError> {
        let user_id = ctx.require_user()?;
        self.require_owner(user_id, folder_id).await?;

        if policy == DeletePolicy::KeepForeignFiles {
            self.relocate_foreign_files(ctx, folder_id).await?;
        }

        let report = self.deleter.delete_folder_and_contents(folder_id).await?;
        info!(
            user_id = %user_id,
            folder_id = %folder_id,
            policy = ?policy,
            folders_deleted = report.folders_deleted,
            files_deleted = report.files_deleted,
            "Folder deleted"
        );
        Ok(report)
    }

    /// Loads a folder and fails unless `user_id` owns it. A missing folder
    /// yields `None`.
    async fn require_owner(
        &self,
        user_id: Uuid,
        folder_id: Uuid,
    ) -> Result<Option<Folder>, AppError> {
        match self.folders.find_by_id(folder_id).await? {
            Some(folder) if !folder.is_owned_by(user_id) => Err(AppError::authentication(
                "You are not the owner of this folder",
            )),
            found => Ok(found),
        }
    }
}

/// Trims a folder name and rejects empty ones.
fn validate_name(name: &str) -> Result<String, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Folder name cannot be empty"));
    }
    Ok(trimmed.to_string())
}
