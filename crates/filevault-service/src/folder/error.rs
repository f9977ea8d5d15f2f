//! Errors raised while deleting a folder subtree.

use thiserror::Error;
use uuid::Uuid;

use filevault_core::error::{AppError, ErrorKind};

/// Why a folder tree deletion aborted.
///
/// Object store failures never appear here: they are reported as
/// [`StorageWarning`](super::delete::StorageWarning)s on the report and the
/// walk continues.
#[derive(Debug, Error)]
pub enum FolderDeleteError {
    /// Listing the files or child folders of a folder failed.
    #[error("failed to list contents of folder {folder_id}: {source}")]
    ListFailed {
        /// Folder whose contents could not be listed.
        folder_id: Uuid,
        /// Underlying store error.
        source: AppError,
    },

    /// Deleting file rows or the folder row itself failed.
    #[error("failed to delete rows of folder {folder_id}: {source}")]
    DeleteRowsFailed {
        /// Folder whose rows could not be deleted.
        folder_id: Uuid,
        /// Underlying store error.
        source: AppError,
    },

    /// A descendant folder failed; `source` holds the inner failure.
    #[error("failed to delete subfolder {id}: {source}")]
    SubfolderFailed {
        /// The direct child of the enclosing folder that failed.
        id: Uuid,
        /// What went wrong inside that subfolder.
        source: Box<FolderDeleteError>,
    },

    /// A folder was reached twice, so the parent links form a cycle.
    #[error("folder {folder_id} was reached twice; folder parent links contain a cycle")]
    CycleDetected {
        /// The folder reached a second time.
        folder_id: Uuid,
    },

    /// The subtree is nested deeper than `deletion.max_depth`.
    #[error("folder {folder_id} is nested deeper than the limit of {max_depth} levels")]
    DepthExceeded {
        /// The first folder beyond the limit.
        folder_id: Uuid,
        /// The configured limit.
        max_depth: usize,
    },
}

impl FolderDeleteError {
    /// Wrap `self` as the failure of subfolder `id`.
    pub fn in_subfolder(self, id: Uuid) -> Self {
        Self::SubfolderFailed {
            id,
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping every `SubfolderFailed` layer.
    pub fn root_cause(&self) -> &FolderDeleteError {
        let mut current = self;
        while let Self::SubfolderFailed { source, .. } = current {
            current = source.as_ref();
        }
        current
    }

    /// The chain of subfolder IDs from the target's child down to the failure.
    pub fn subfolder_path(&self) -> Vec<Uuid> {
        let mut path = Vec::new();
        let mut current = self;
        while let Self::SubfolderFailed { id, source } = current {
            path.push(*id);
            current = source.as_ref();
        }
        path
    }

    /// The folder at which the walk actually failed.
    pub fn failed_folder_id(&self) -> Uuid {
        match self.root_cause() {
            Self::ListFailed { folder_id, .. }
            | Self::DeleteRowsFailed { folder_id, .. }
            | Self::CycleDetected { folder_id }
            | Self::DepthExceeded { folder_id, .. } => *folder_id,
            Self::SubfolderFailed { id, .. } => *id,
        }
    }
}

impl From<FolderDeleteError> for AppError {
    fn from(err: FolderDeleteError) -> Self {
        let kind = match err.root_cause() {
            FolderDeleteError::ListFailed { source, .. }
            | FolderDeleteError::DeleteRowsFailed { source, .. } => source.kind,
            _ => ErrorKind::Internal,
        };
        AppError::with_source(kind, err.to_string(), err)
    }
}
