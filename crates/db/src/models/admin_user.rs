//! Admin user model and DTOs.

use innkeep_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `admin_users` table.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an admin account. The password is already hashed.
pub struct CreateAdminUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
