//! File services: upload, download, deletion and storage key naming.

pub mod naming;
pub mod service;

pub use naming::{sanitize_file_name, storage_path};
pub use service::{DownloadResult, FileService, UploadRequest};
