//! # filevault-database
//!
//! PostgreSQL connection management, migrations, and the folder/file
//! catalog. Services depend on the [`FolderStore`] and [`FileStore`]
//! traits; the sqlx repositories are the production implementations.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{FileStore, FolderStore};
