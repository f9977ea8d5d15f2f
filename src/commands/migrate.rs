//! Database migration command.

use filevault_core::config::AppConfig;
use filevault_core::error::AppError;
use filevault_database::DatabasePool;
use filevault_database::migration::run_migrations;

use crate::output;

/// Apply all pending migrations.
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let db = DatabasePool::connect(&config.database).await?;
    run_migrations(db.pool()).await?;
    db.close().await;
    output::print_success("Migrations applied");
    Ok(())
}
