//! Staff authentication from `Authorization: Bearer <jwt>`.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use innkeep_core::error::CoreError;
use innkeep_core::types::DbId;

use crate::auth::jwt::{validate_token, Claims};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A staff member authenticated by access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: String,
    is_admin: bool,
}

impl AuthUser {
    /// Reject with 403 unless the token carries the admin role.
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin {
            return Ok(());
        }
        tracing::debug!(user_id = self.user_id, role = %self.role, "Admin role required");
        Err(AppError::Core(CoreError::Forbidden(
            "Admin role required".into(),
        )))
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        AuthUser {
            is_admin: claims.is_admin(),
            user_id: claims.sub,
            role: claims.role,
        }
    }
}

/// The token after `Bearer `, if the header uses that scheme.
pub(crate) fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Validate a bearer token against the configured signing secret.
pub(crate) fn authenticate_bearer(token: &str, state: &AppState) -> AppResult<AuthUser> {
    validate_token(token, &state.config.jwt)
        .map(AuthUser::from)
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            let message = if parts.headers.contains_key(AUTHORIZATION) {
                "Expected Authorization: Bearer <token>"
            } else {
                "Missing Authorization header"
            };
            AppError::Core(CoreError::Unauthorized(message.into()))
        })?;

        authenticate_bearer(token, state)
    }
}
