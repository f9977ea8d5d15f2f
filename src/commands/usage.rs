//! Storage usage command.

use filevault_core::error::AppError;
use filevault_entity::storage::format_bytes;

use super::Vault;
use crate::output::{self, OutputFormat};

/// Print used bytes against the configured quota.
pub async fn execute(vault: &Vault, format: OutputFormat) -> Result<(), AppError> {
    let usage = vault.usage.usage().await?;

    match format {
        OutputFormat::Json => output::print_json(&usage),
        OutputFormat::Table => {
            output::print_kv("Used", &usage.to_string());
            output::print_kv("Quota", &format_bytes(usage.quota_bytes, 2));
            if usage.used_bytes > usage.quota_bytes {
                output::print_warning("Storage quota exceeded");
            }
        }
    }
    Ok(())
}
