//! Pre-deletion inspection of a folder.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happens to files uploaded by other users when a folder is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Delete every file in the subtree regardless of uploader.
    #[default]
    DeleteAll,
    /// Move other users' files to the root level before deleting.
    KeepForeignFiles,
}

/// Summary shown to the user before a folder is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionPreview {
    /// The inspected folder.
    pub folder_id: Uuid,
    /// Folder name.
    pub name: String,
    /// Whether the folder directly contains files or subfolders.
    pub has_content: bool,
    /// Whether a direct file was uploaded by someone other than the caller.
    pub foreign_files: bool,
    /// Direct subfolder count.
    pub subfolder_count: u64,
    /// Direct file count.
    pub file_count: u64,
}

impl DeletionPreview {
    /// Text for a confirmation prompt.
    pub fn confirmation_message(&self) -> String {
        let mut message = if self.has_content {
            format!(
                "Delete folder \"{}\" and everything inside it? This cannot be undone.",
                self.name
            )
        } else {
            format!("Delete folder \"{}\"?", self.name)
        };
        if self.foreign_files {
            message.push_str(" Some files in this folder were uploaded by other users.");
        }
        message
    }
}
