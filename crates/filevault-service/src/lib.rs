//! # filevault-service
//!
//! Business logic for FileVault. Each service orchestrates the folder/file
//! catalog and the object store to implement one group of use cases; the
//! centrepiece is [`FolderTreeDeleter`], the recursive folder removal.
//!
//! Services follow constructor injection: all stores are provided at
//! construction time as `Arc<dyn …>` trait objects.

pub mod context;
pub mod file;
pub mod folder;
pub mod usage;

pub use context::RequestContext;
pub use file::{DownloadResult, FileService, UploadRequest};
pub use folder::{
    DeletePolicy, DeletionOutcome, DeletionPreview, DeletionReport, FolderDeleteError,
    FolderService, FolderTreeDeleter, StorageWarning,
};
pub use usage::UsageService;
