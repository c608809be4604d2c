//! Guest email-session extractors.
//!
//! Guests present the token from `POST /otp/verify` either as
//! `Authorization: EmailToken <token>` or in the `x-email-token` header.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use innkeep_core::error::CoreError;

use super::auth::{authenticate_bearer, bearer_token};
use crate::engine::cancellation::CancelActor;
use crate::engine::guest_access::{resolve_session, GuestIdentity};
use crate::error::AppError;
use crate::state::AppState;

/// Alternate header carrying a guest session token.
pub const EMAIL_TOKEN_HEADER: &str = "x-email-token";

/// Authorization scheme for guest session tokens.
const EMAIL_TOKEN_SCHEME: &str = "EmailToken ";

/// Pull a guest session token out of the request headers.
pub(crate) fn email_token(parts: &Parts) -> Option<&str> {
    let from_authorization = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(EMAIL_TOKEN_SCHEME));

    from_authorization
        .or_else(|| {
            parts
                .headers
                .get(EMAIL_TOKEN_HEADER)
                .and_then(|v| v.to_str().ok())
        })
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// A guest holding a live email session.
#[derive(Debug, Clone)]
pub struct GuestSession(pub GuestIdentity);

impl FromRequestParts<AppState> for GuestSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = email_token(parts).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing email session token".into(),
            ))
        })?;
        let identity = resolve_session(&state.pool, token).await?;
        Ok(GuestSession(identity))
    }
}

/// Whoever is acting on a booking: an admin with a Bearer token, or a guest
/// with an email session.
///
/// A Bearer token always takes the admin path and must carry the admin role.
#[derive(Debug, Clone)]
pub struct BookingActor(pub CancelActor);

impl FromRequestParts<AppState> for BookingActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(token) = bearer_token(parts) {
            let user = authenticate_bearer(token, state)?;
            user.require_admin()?;
            return Ok(BookingActor(CancelActor::Admin {
                user_id: user.user_id,
            }));
        }

        let GuestSession(identity) = GuestSession::from_request_parts(parts, state).await?;
        Ok(BookingActor(CancelActor::Guest {
            email: identity.email,
        }))
    }
}
