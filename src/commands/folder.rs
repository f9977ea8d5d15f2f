//! Folder management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use filevault_core::error::AppError;
use filevault_entity::folder::{Folder, ListingItem};
use filevault_entity::storage::format_bytes;
use filevault_service::{DeletePolicy, RequestContext};

use super::Vault;
use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List the folders and files inside a folder (root when omitted)
    List {
        /// Folder ID
        folder_id: Option<Uuid>,
    },
    /// Create a new folder
    Create {
        /// Folder name
        name: String,
        /// Parent folder ID (omit for root)
        #[arg(short, long)]
        parent: Option<Uuid>,
    },
    /// Rename a folder
    Rename {
        /// Folder ID
        folder_id: Uuid,
        /// New name
        name: String,
    },
    /// Show what deleting a folder would affect
    Inspect {
        /// Folder ID
        folder_id: Uuid,
    },
    /// Delete a folder and everything inside it
    Delete {
        /// Folder ID
        folder_id: Uuid,
        /// Move other users' files to the root instead of deleting them
        #[arg(long)]
        keep_foreign: bool,
        /// Skip the confirmation check for non-empty folders
        #[arg(short, long)]
        yes: bool,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: String,
    /// Name
    name: String,
    /// Owner
    owner: String,
    /// Parent
    parent: String,
    /// Created at
    created_at: String,
}

impl From<&Folder> for FolderRow {
    fn from(folder: &Folder) -> Self {
        Self {
            id: folder.id.to_string(),
            name: folder.name.clone(),
            owner: folder.owner_id.to_string(),
            parent: folder
                .parent_folder_id
                .map_or_else(|| "-".to_string(), |id| id.to_string()),
            created_at: folder.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Listing display row
#[derive(Debug, Serialize, Tabled)]
struct ItemRow {
    /// Folder or file
    kind: &'static str,
    /// ID
    id: String,
    /// Name
    name: String,
    /// Owner or uploader
    owner: String,
    /// Size
    size: String,
}

impl From<&ListingItem> for ItemRow {
    fn from(item: &ListingItem) -> Self {
        let (kind, id, size) = match item {
            ListingItem::Folder(folder) => ("folder", folder.id, "-".to_string()),
            ListingItem::File(file) => (
                "file",
                file.id,
                format_bytes(file.size_bytes.max(0) as u64, 2),
            ),
        };
        Self {
            kind,
            id: id.to_string(),
            name: item.name().to_string(),
            owner: item.owner_id().to_string(),
            size,
        }
    }
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    vault: &Vault,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        FolderCommand::List { folder_id } => {
            let listing = vault.folders.list_contents(ctx, *folder_id).await?;
            let rows: Vec<ItemRow> = listing.items().iter().map(ItemRow::from).collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Create { name, parent } => {
            let folder = vault.folders.create_folder(ctx, name, *parent).await?;
            output::print_item(&FolderRow::from(&folder), format);
        }
        FolderCommand::Rename { folder_id, name } => {
            let folder = vault.folders.rename_folder(ctx, *folder_id, name).await?;
            output::print_item(&FolderRow::from(&folder), format);
        }
        FolderCommand::Inspect { folder_id } => {
            let preview = vault.folders.inspect_for_deletion(ctx, *folder_id).await?;
            match format {
                OutputFormat::Json => output::print_json(&preview),
                OutputFormat::Table => {
                    output::print_kv("Folder", &preview.name);
                    output::print_kv("Subfolders", &preview.subfolder_count.to_string());
                    output::print_kv("Files", &preview.file_count.to_string());
                    output::print_kv("Other users' files", yes_no(preview.foreign_files));
                    println!("{}", preview.confirmation_message());
                }
            }
        }
        FolderCommand::Delete {
            folder_id,
            keep_foreign,
            yes,
        } => {
            let preview = vault.folders.inspect_for_deletion(ctx, *folder_id).await?;
            if preview.has_content && !yes {
                println!("{}", preview.confirmation_message());
                output::print_warning("Nothing deleted. Re-run with --yes to confirm.");
                return Ok(());
            }

            let policy = if *keep_foreign {
                DeletePolicy::KeepForeignFiles
            } else {
                DeletePolicy::DeleteAll
            };
            let report = vault.folders.delete_folder(ctx, *folder_id, policy).await?;

            match format {
                OutputFormat::Json => output::print_json(&report),
                OutputFormat::Table => {
                    output::print_success(&format!("Deleted folder \"{}\"", preview.name));
                    output::print_kv("Folders deleted", &report.folders_deleted.to_string());
                    output::print_kv("Files deleted", &report.files_deleted.to_string());
                    output::print_kv("Blobs removed", &report.blobs_removed.to_string());
                    for warning in &report.warnings {
                        output::print_warning(&format!(
                            "Storage cleanup in folder {}: {}",
                            warning.folder_id, warning.message
                        ));
                    }
                }
            }
        }
    }

    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
