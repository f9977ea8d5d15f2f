//! Folder domain entities.

pub mod listing;
pub mod model;

pub use listing::{FolderListing, ListingItem};
pub use model::{CreateFolder, Folder};
