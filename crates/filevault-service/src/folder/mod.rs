//! Folder services: CRUD, listing and recursive deletion.

pub mod delete;
pub mod error;
pub mod preview;
pub mod service;

pub use delete::{DeletionOutcome, DeletionReport, FolderTreeDeleter, StorageWarning};
pub use error::FolderDeleteError;
pub use preview::{DeletePolicy, DeletionPreview};
pub use service::FolderService;
