//! Recursive folder deletion.
//!
//! Removes a folder, the files directly inside it, and every descendant
//! folder with their files, in depth-first post-order: a folder's files go
//! first, then each child subtree one at a time, then the folder row. No
//! step is rolled back when a later one fails.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use filevault_core::config::DeletionConfig;
use filevault_core::traits::object_store::ObjectStore;
use filevault_database::store::{FileStore, FolderStore};

use super::error::FolderDeleteError;

/// A blob removal problem that did not stop the deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageWarning {
    /// Folder whose files were being removed.
    pub folder_id: Uuid,
    /// Storage paths passed to the object store.
    pub paths: Vec<String>,
    /// `true` when the store only reported keys as already absent.
    pub missing: bool,
    /// The store's error message.
    pub message: String,
}

/// What a completed deletion removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionReport {
    /// The folder the deletion was requested for.
    pub folder_id: Uuid,
    /// Folder rows deleted (target included).
    pub folders_deleted: u64,
    /// File rows deleted.
    pub files_deleted: u64,
    /// Blobs removed in batches that fully succeeded.
    pub blobs_removed: u64,
    /// Non-fatal object store problems.
    pub warnings: Vec<StorageWarning>,
}

impl DeletionReport {
    fn new(folder_id: Uuid) -> Self {
        Self {
            folder_id,
            ..Self::default()
        }
    }
}

/// Flat success/error view of a deletion, for callers that only notify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionOutcome {
    /// Whether the whole subtree was deleted.
    pub success: bool,
    /// Error message when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> From<&Result<T, FolderDeleteError>> for DeletionOutcome {
    fn from(result: &Result<T, FolderDeleteError>) -> Self {
        match result {
            Ok(_) => Self {
                success: true,
                error: None,
            },
            Err(e) => Self {
                success: false,
                error: Some(e.to_string()),
            },
        }
    }
}

/// One folder on the walk stack.
#[derive(Debug)]
struct Frame {
    folder_id: Uuid,
    /// Children still to visit; `None` until the folder's files are gone.
    children: Option<VecDeque<Uuid>>,
}

impl Frame {
    fn new(folder_id: Uuid) -> Self {
        Self {
            folder_id,
            children: None,
        }
    }
}

/// Next action for the frame on top of the stack.
enum Step {
    /// Purge files, then list children.
    Expand(Uuid),
    /// Descend into a child.
    Descend(Uuid),
    /// All children gone; delete the folder row.
    Finish(Uuid),
}

/// Deletes folder subtrees against the catalog and object store.
#[derive(Debug, Clone)]
pub struct FolderTreeDeleter {
    folders: Arc<dyn FolderStore>,
    files: Arc<dyn FileStore>,
    objects: Arc<dyn ObjectStore>,
    max_depth: usize,
}

impl FolderTreeDeleter {
    /// Creates a deleter over the given stores.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
        objects: Arc<dyn ObjectStore>,
        config: &DeletionConfig,
    ) -> Self {
        Self {
            folders,
            files,
            objects,
            max_depth: config.max_depth,
        }
    }

    /// Permanently removes `folder_id`, its files, and all descendants.
    ///
    /// Every file is removed regardless of uploader. A folder that does not
    /// exist deletes nothing and still succeeds. On failure, whatever was
    /// already removed stays removed and the error names the chain of
    /// subfolders leading to the failing one.
    pub async fn delete_folder_and_contents(
        &self,
        folder_id: Uuid,
    ) -> Result<DeletionReport, FolderDeleteError> {
        let mut report = DeletionReport::new(folder_id);
        let mut stack = vec![Frame::new(folder_id)];
        let mut visited = HashSet::from([folder_id]);

        match self.walk(&mut stack, &mut visited, &mut report).await {
            Ok(()) => {
                info!(
                    folder_id = %folder_id,
                    folders_deleted = report.folders_deleted,
                    files_deleted = report.files_deleted,
                    warnings = report.warnings.len(),
                    "Folder and contents deleted"
                );
                Ok(report)
            }
            Err(inner) => {
                // Every frame above the target is a subfolder the failure sits in.
                let err = stack
                    .iter()
                    .skip(1)
                    .rev()
                    .fold(inner, |err, frame| err.in_subfolder(frame.folder_id));
                error!(
                    folder_id = %folder_id,
                    failed_at = %err.failed_folder_id(),
                    folders_deleted = report.folders_deleted,
                    files_deleted = report.files_deleted,
                    error = %err,
                    "Folder deletion aborted"
                );
                Err(err)
            }
        }
    }

    /// Drives the stack until it is empty or a step fails.
    ///
    /// On error the failing frame is still on top of `stack`.
    async fn walk(
        &self,
        stack: &mut Vec<Frame>,
        visited: &mut HashSet<Uuid>,
        report: &mut DeletionReport,
    ) -> Result<(), FolderDeleteError> {
        loop {
            let step = match stack.last_mut() {
                None => return Ok(()),
                Some(frame) => match frame.children.as_mut() {
                    None => Step::Expand(frame.folder_id),
                    Some(queue) => match queue.pop_front() {
                        Some(child_id) => Step::Descend(child_id),
                        None => Step::Finish(frame.folder_id),
                    },
                },
            };

            match step {
                Step::Expand(folder_id) => {
                    self.purge_files(folder_id, report).await?;
                    let children = self
                        .folders
                        .find_children(Some(folder_id))
                        .await
                        .map_err(|source| FolderDeleteError::ListFailed { folder_id, source })?;
                    debug!(folder_id = %folder_id, children = children.len(), "Listed subfolders");
                    if let Some(frame) = stack.last_mut() {
                        frame.children = Some(children.into_iter().map(|f| f.id).collect());
                    }
                }
                Step::Descend(child_id) => {
                    if !visited.insert(child_id) {
                        return Err(FolderDeleteError::CycleDetected {
                            folder_id: child_id,
                        });
                    }
                    // The child sits at depth `stack.len()` below the target.
                    if stack.len() > self.max_depth {
                        return Err(FolderDeleteError::DepthExceeded {
                            folder_id: child_id,
                            max_depth: self.max_depth,
                        });
                    }
                    stack.push(Frame::new(child_id));
                }
                Step::Finish(folder_id) => {
                    let deleted = self.folders.delete(folder_id).await.map_err(|source| {
                        FolderDeleteError::DeleteRowsFailed { folder_id, source }
                    })?;
                    if deleted {
                        report.folders_deleted += 1;
                    } else {
                        debug!(folder_id = %folder_id, "Folder row already absent");
                    }
                    stack.pop();
                }
            }
        }
    }

    /// Removes the blobs and rows of the files directly inside `folder_id`.
    ///
    /// Blob removal is best effort; the row delete must succeed.
    async fn purge_files(
        &self,
        folder_id: Uuid,
        report: &mut DeletionReport,
    ) -> Result<(), FolderDeleteError> {
        let files = self
            .files
            .find_by_folder(Some(folder_id))
            .await
            .map_err(|source| FolderDeleteError::ListFailed { folder_id, source })?;
        if files.is_empty() {
            return Ok(());
        }

        let paths: Vec<String> = files.iter().map(|f| f.storage_path.clone()).collect();
        match self.objects.remove_many(&paths).await {
            Ok(()) => report.blobs_removed += paths.len() as u64,
            Err(e) if e.is_not_found() => {
                debug!(folder_id = %folder_id, error = %e, "Some blobs were already absent");
                report.warnings.push(StorageWarning {
                    folder_id,
                    paths,
                    missing: true,
                    message: e.message,
                });
            }
            Err(e) => {
                warn!(
                    folder_id = %folder_id,
                    count = paths.len(),
                    error = %e,
                    "Failed to remove blobs; continuing with row deletion"
                );
                report.warnings.push(StorageWarning {
                    folder_id,
                    paths,
                    missing: false,
                    message: e.to_string(),
                });
            }
        }

        let ids: Vec<Uuid> = files.iter().map(|f| f.id).collect();
        let deleted = self
            .files
            .delete_many(&ids)
            .await
            .map_err(|source| FolderDeleteError::DeleteRowsFailed { folder_id, source })?;
        report.files_deleted += deleted;
        debug!(folder_id = %folder_id, files = deleted, "Deleted file rows");
        Ok(())
    }
}
