//! sqlx-backed implementations of the catalog traits.

pub mod file;
pub mod folder;

pub use file::FileRepository;
pub use folder::FolderRepository;
