//! Folder contents as presented to a browsing user.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::file::FileRecord;
use crate::folder::Folder;

/// The direct contents of one folder (or of the root when `folder_id` is `None`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderListing {
    /// The folder being listed; `None` for the root.
    pub folder_id: Option<Uuid>,
    /// Direct child folders, ordered by name.
    pub folders: Vec<Folder>,
    /// Direct files, newest first.
    pub files: Vec<FileRecord>,
}

/// One entry of a merged listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "item_type", rename_all = "snake_case")]
pub enum ListingItem {
    /// A child folder.
    Folder(Folder),
    /// A file.
    File(FileRecord),
}

impl ListingItem {
    /// Display name of the entry.
    pub fn name(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.name,
            Self::File(file) => &file.file_name,
        }
    }

    /// The user the entry belongs to (folder owner or file uploader).
    pub fn owner_id(&self) -> Uuid {
        match self {
            Self::Folder(folder) => folder.owner_id,
            Self::File(file) => file.uploader_id,
        }
    }

    fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }
}

impl FolderListing {
    /// Whether the folder has no files and no subfolders.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }

    /// Merge folders and files: folders first, then case-insensitive by name.
    pub fn items(&self) -> Vec<ListingItem> {
        let mut items: Vec<ListingItem> = self
            .folders
            .iter()
            .cloned()
            .map(ListingItem::Folder)
            .chain(self.files.iter().cloned().map(ListingItem::File))
            .collect();

        items.sort_by(|a, b| match (a.is_folder(), b.is_folder()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a
                .name()
                .to_lowercase()
                .cmp(&b.name().to_lowercase())
                .then_with(|| a.name().cmp(b.name())),
        });
        items
    }
}
