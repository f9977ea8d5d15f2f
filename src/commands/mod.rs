//! CLI command definitions and dispatch.

pub mod file;
pub mod folder;
pub mod migrate;
pub mod usage;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use filevault_core::config::AppConfig;
use filevault_core::error::AppError;
use filevault_database::{DatabasePool, FileStore, FolderStore};
use filevault_service::{
    FileService, FolderService, FolderTreeDeleter, RequestContext, UsageService,
};
use filevault_storage::build_object_store;

use crate::output::OutputFormat;

/// FileVault: folders and files over PostgreSQL and an object store
#[derive(Debug, Parser)]
#[command(name = "filevault", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Acting user ID
    #[arg(short, long)]
    pub user: Option<Uuid>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply database migrations
    Migrate,
    /// Folder management
    Folder(folder::FolderArgs),
    /// File management
    File(file::FileArgs),
    /// Show storage usage against the quota
    Usage,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate => migrate::execute(config).await,
            Commands::Folder(args) => {
                let vault = Vault::open(config).await?;
                folder::execute(args, &vault, &self.context(), self.format).await
            }
            Commands::File(args) => {
                let vault = Vault::open(config).await?;
                file::execute(args, &vault, &self.context(), self.format).await
            }
            Commands::Usage => {
                let vault = Vault::open(config).await?;
                usage::execute(&vault, self.format).await
            }
        }
    }

    /// Request context for the `--user` given, anonymous otherwise.
    fn context(&self) -> RequestContext {
        self.user
            .map(|id| RequestContext::new(id, None))
            .unwrap_or_else(RequestContext::anonymous)
    }
}

/// Services wired against the configured stores.
#[derive(Debug)]
pub struct Vault {
    /// Folder operations
    pub folders: FolderService,
    /// File operations
    pub files: FileService,
    /// Quota reporting
    pub usage: UsageService,
}

impl Vault {
    /// Connect to the database and object store and build the services.
    pub async fn open(config: &AppConfig) -> Result<Self, AppError> {
        let db = DatabasePool::connect(&config.database).await?;
        let objects = build_object_store(&config.storage).await?;

        let folder_store: Arc<dyn FolderStore> = db.folders();
        let file_store: Arc<dyn FileStore> = db.files();

        let deleter = FolderTreeDeleter::new(
            folder_store.clone(),
            file_store.clone(),
            objects.clone(),
            &config.deletion,
        );

        Ok(Self {
            folders: FolderService::new(folder_store.clone(), file_store.clone(), deleter),
            files: FileService::new(
                folder_store,
                file_store.clone(),
                objects,
                config.storage.clone(),
            ),
            usage: UsageService::new(file_store, &config.storage),
        })
    }
}
