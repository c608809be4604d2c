//! Email session model and DTOs.

use innkeep_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `email_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct EmailSession {
    pub id: DbId,
    pub token_hash: String,
    pub email: String,
    pub expires_at: Timestamp,
    pub valid: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl EmailSession {
    /// Whether the session may authorize an action at `now`.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.valid && now < self.expires_at
    }
}

/// DTO for issuing a session.
pub struct CreateEmailSession {
    pub token_hash: String,
    pub email: String,
    pub expires_at: Timestamp,
}
