//! Optional first admin account created from the environment at startup.

use innkeep_core::error::CoreError;
use innkeep_db::models::admin_user::{AdminUser, CreateAdminUser};
use innkeep_db::repositories::AdminUserRepo;
use innkeep_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};

/// Credentials for the bootstrap admin.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl BootstrapAdmin {
    /// Read `BOOTSTRAP_ADMIN_USERNAME`, `BOOTSTRAP_ADMIN_PASSWORD`, and
    /// `BOOTSTRAP_ADMIN_EMAIL`. Returns `None` unless username and password
    /// are both set; the email defaults to `<username>@localhost`.
    pub fn from_env() -> Option<Self> {
        let username = std::env::var("BOOTSTRAP_ADMIN_USERNAME")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())?;
        let password = std::env::var("BOOTSTRAP_ADMIN_PASSWORD")
            .ok()
            .filter(|v| !v.is_empty())?;
        let email = std::env::var("BOOTSTRAP_ADMIN_EMAIL")
            .ok()
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| format!("{username}@localhost"));
        Some(Self {
            username,
            email,
            password,
        })
    }
}

/// Create the admin unless an account with that username already exists.
///
/// Returns the created account, or `None` when nothing was done. Existing
/// accounts are left untouched, password included.
pub async fn ensure_admin(pool: &DbPool, admin: &BootstrapAdmin) -> AppResult<Option<AdminUser>> {
    if AdminUserRepo::find_by_username(pool, &admin.username)
        .await?
        .is_some()
    {
        tracing::debug!(username = %admin.username, "Bootstrap admin already exists");
        return Ok(None);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = AdminUserRepo::create(
        pool,
        &CreateAdminUser {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Bootstrap admin created");
    Ok(Some(user))
}
