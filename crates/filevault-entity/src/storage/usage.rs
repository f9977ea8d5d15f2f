//! Storage usage value object.

use serde::{Deserialize, Serialize};

/// Bytes consumed by all file records against the configured quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageUsage {
    /// Sum of `size_bytes` over all file records.
    pub used_bytes: u64,
    /// Configured quota in bytes.
    pub quota_bytes: u64,
}

impl StorageUsage {
    /// Create a usage snapshot.
    pub fn new(used_bytes: u64, quota_bytes: u64) -> Self {
        Self {
            used_bytes,
            quota_bytes,
        }
    }

    /// Usage percentage (0.0 when the quota is zero).
    pub fn percentage(&self) -> f64 {
        if self.quota_bytes == 0 {
            0.0
        } else {
            (self.used_bytes as f64 / self.quota_bytes as f64) * 100.0
        }
    }

    /// Check if adding the given number of bytes would exceed the quota.
    pub fn would_exceed(&self, additional_bytes: u64) -> bool {
        self.used_bytes.saturating_add(additional_bytes) > self.quota_bytes
    }
}

impl std::fmt::Display for StorageUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({:.2}%)",
            format_bytes(self.used_bytes, 2),
            self.percentage()
        )
    }
}

const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Render a byte count with 1024-based units, trimming trailing zeros.
///
/// `format_bytes(1536, 2)` is `"1.5 KB"`, `format_bytes(0, 2)` is `"0 Bytes"`.
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut index = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && index < UNITS.len() - 1 {
        value /= 1024.0;
        index += 1;
    }

    let rendered = format!("{value:.decimals$}");
    let rendered = if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        rendered
    };
    format!("{rendered} {}", UNITS[index])
}
