//! File management CLI commands.

use std::path::PathBuf;

use bytes::Bytes;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use filevault_core::error::AppError;
use filevault_entity::file::FileRecord;
use filevault_entity::storage::format_bytes;
use filevault_service::{RequestContext, UploadRequest};

use super::Vault;
use crate::output::{self, OutputFormat};

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FileArgs {
    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// Upload local files, stopping at the first failure
    Upload {
        /// Local paths to read
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Target folder ID (omit for root)
        #[arg(short, long)]
        folder: Option<Uuid>,
        /// MIME type to record
        #[arg(short, long)]
        mime: Option<String>,
    },
    /// Delete a file
    Delete {
        /// File ID
        file_id: Uuid,
    },
    /// Download a file to a local path
    Download {
        /// File ID
        file_id: Uuid,
        /// Destination path (defaults to the original file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// File display row
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    /// File ID
    id: String,
    /// Name
    name: String,
    /// Size
    size: String,
    /// Folder
    folder: String,
    /// Storage key
    storage_path: String,
}

impl From<&FileRecord> for FileRow {
    fn from(file: &FileRecord) -> Self {
        Self {
            id: file.id.to_string(),
            name: file.file_name.clone(),
            size: format_bytes(file.size_bytes.max(0) as u64, 2),
            folder: file
                .folder_id
                .map_or_else(|| "root".to_string(), |id| id.to_string()),
            storage_path: file.storage_path.clone(),
        }
    }
}

/// Execute file commands
pub async fn execute(
    args: &FileArgs,
    vault: &Vault,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        FileCommand::Upload {
            paths,
            folder,
            mime,
        } => {
            for path in paths {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .ok_or_else(|| {
                        AppError::validation(format!("Not a file path: {}", path.display()))
                    })?;
                let data = tokio::fs::read(path).await?;

                let file = vault
                    .files
                    .upload(
                        ctx,
                        UploadRequest {
                            folder_id: *folder,
                            file_name,
                            mime_type: mime.clone(),
                            data: Bytes::from(data),
                        },
                    )
                    .await?;
                output::print_item(&FileRow::from(&file), format);
            }
        }
        FileCommand::Delete { file_id } => {
            vault.files.delete_file(ctx, *file_id).await?;
            output::print_success(&format!("Deleted file {file_id}"));
        }
        FileCommand::Download {
            file_id,
            output: destination,
        } => {
            let download = vault.files.download(ctx, *file_id).await?;
            let target = destination
                .clone()
                .unwrap_or_else(|| PathBuf::from(&download.file.file_name));
            tokio::fs::write(&target, &download.data).await?;
            output::print_success(&format!(
                "Saved {} ({}) to {}",
                download.file.file_name,
                download.content_type,
                target.display()
            ));
        }
    }

    Ok(())
}
