//! Staff login. Guests never come through here; they use email codes.

use axum::extract::State;
use axum::Json;
use innkeep_core::error::CoreError;
use innkeep_core::roles::ROLE_ADMIN;
use innkeep_core::types::DbId;
use innkeep_db::models::admin_user::AdminUser;
use innkeep_db::repositories::AdminUserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Same message for unknown usernames and wrong passwords.
const BAD_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Seconds until `access_token` expires.
    pub expires_in: i64,
    pub user: StaffProfile,
}

#[derive(Debug, Serialize)]
pub struct StaffProfile {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: &'static str,
}

impl From<AdminUser> for StaffProfile {
    fn from(admin: AdminUser) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            email: admin.email,
            role: ROLE_ADMIN,
        }
    }
}

fn bad_credentials() -> AppError {
    CoreError::Unauthorized(BAD_CREDENTIALS.into()).into()
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let Some(admin) = AdminUserRepo::find_by_username(&state.pool, credentials.username.trim()).await?
    else {
        return Err(bad_credentials());
    };

    if !admin.is_active {
        return Err(CoreError::Forbidden("Account is deactivated".into()).into());
    }

    let matches = verify_password(&credentials.password, &admin.password_hash)
        .map_err(|e| AppError::InternalError(format!("Stored password hash unreadable: {e}")))?;
    if !matches {
        tracing::info!(user_id = admin.id, "Admin login rejected");
        return Err(bad_credentials());
    }

    AdminUserRepo::record_login(&state.pool, admin.id).await?;
    let access_token = generate_access_token(admin.id, ROLE_ADMIN, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Could not sign access token: {e}")))?;

    tracing::info!(user_id = admin.id, "Admin logged in");
    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.expires_in_secs(),
        user: admin.into(),
    }))
}
