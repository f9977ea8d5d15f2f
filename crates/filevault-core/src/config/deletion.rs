//! Folder tree deletion limits.

use serde::{Deserialize, Serialize};

/// Bounds applied while walking a folder subtree for deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionConfig {
    /// Deepest nesting level (target folder = 0) the walk will descend to.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for DeletionConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    64
}
