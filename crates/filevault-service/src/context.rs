//! Request context carrying the acting user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use filevault_core::error::AppError;

/// Context for the current request.
///
/// Built by whatever authenticates the caller and passed into service
/// methods so that every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's ID. The nil UUID means "not signed in".
    pub user_id: Uuid,
    /// Display name, if known.
    pub username: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context for a user.
    pub fn new(user_id: Uuid, username: Option<String>) -> Self {
        Self {
            user_id,
            username,
            request_time: Utc::now(),
        }
    }

    /// A context with no signed-in user.
    pub fn anonymous() -> Self {
        Self::new(Uuid::nil(), None)
    }

    /// Returns whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        !self.user_id.is_nil()
    }

    /// Fails with `Authentication` unless a user is signed in.
    pub fn require_user(&self) -> Result<Uuid, AppError> {
        if self.is_authenticated() {
            Ok(self.user_id)
        } else {
            Err(AppError::authentication(
                "You must be signed in to perform this action",
            ))
        }
    }
}
