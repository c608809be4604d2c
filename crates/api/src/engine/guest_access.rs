//! One-time codes and email sessions for account-less guests.
//!
//! A guest proves control of an email address by echoing a six-digit code
//! sent to it, and receives a short-lived bearer session scoped to that
//! address. Sessions only authorize listing and cancelling the address's own
//! bookings.

use chrono::{Duration, Utc};
use innkeep_core::error::CoreError;
use innkeep_core::guest::parse_email;
use innkeep_core::otp::{generate_code, generate_session_token, hash_session_token, is_well_formed_code};
use innkeep_core::types::{DbId, Timestamp};
use innkeep_db::models::email_session::CreateEmailSession;
use innkeep_db::models::otp_request::CreateOtpRequest;
use innkeep_db::repositories::{EmailSessionRepo, OtpRequestRepo};
use innkeep_db::DbPool;
use innkeep_events::{message, Notifier};
use serde::Serialize;

use crate::auth::password::{hash_password, verify_password};
use crate::config::GuestAccessConfig;
use crate::error::{AppError, AppResult};

/// A freshly issued session. `token` is the only copy of the plaintext.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedSession {
    pub token: String,
    pub email: String,
    pub expires_at: Timestamp,
}

/// The identity behind a valid session.
#[derive(Debug, Clone, Serialize)]
pub struct GuestIdentity {
    pub session_id: DbId,
    pub email: String,
    pub expires_at: Timestamp,
}

/// Issue a one-time code for `raw_email` and send it.
///
/// Rejects with `TooManyRequests` once the address has reached its quota for
/// the trailing window. Delivery failures are logged and not reported, so
/// the response never reveals anything about the address.
pub async fn request_code(
    pool: &DbPool,
    notifier: &dyn Notifier,
    config: &GuestAccessConfig,
    raw_email: &str,
) -> AppResult<()> {
    let email = parse_email(raw_email)?;
    let now = Utc::now();

    let mut tx = pool.begin().await?;
    OtpRequestRepo::lock_email(&mut tx, &email).await?;

    let window_start = now - Duration::minutes(config.rate_window_mins);
    let recent = OtpRequestRepo::count_created_since(&mut tx, &email, window_start).await?;
    if recent >= config.rate_limit {
        tracing::info!(recent, limit = config.rate_limit, "OTP request rate limited");
        return Err(CoreError::TooManyRequests(
            "Too many code requests for this email. Please try again later.".into(),
        )
        .into());
    }

    let code = generate_code();
    let otp_hash = hash_password(&code)
        .map_err(|e| AppError::InternalError(format!("OTP hashing error: {e}")))?;

    let otp = OtpRequestRepo::create(
        &mut tx,
        &CreateOtpRequest {
            email: email.clone(),
            otp_hash,
            expires_at: now + Duration::minutes(config.otp_ttl_mins),
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(otp_request_id = otp.id, "OTP issued");

    let notification = message::otp_code(&email, &code, config.otp_ttl_mins);
    if let Err(e) = notifier.send(&notification).await {
        tracing::warn!(
            otp_request_id = otp.id,
            channel = notifier.channel(),
            error = %e,
            "OTP delivery failed"
        );
    }

    Ok(())
}

/// Exchange a code for a session.
///
/// Only the most recent unused, unexpired code for the address is
/// considered. Wrong codes, expired codes, and codes consumed by a
/// concurrent request all fail the same way. Each wrong guess is counted
/// against the code, which is burned after `max_verify_attempts` of them.
pub async fn verify_code(
    pool: &DbPool,
    config: &GuestAccessConfig,
    raw_email: &str,
    code: &str,
) -> AppResult<IssuedSession> {
    let email = parse_email(raw_email)?;
    let code = code.trim();
    if !is_well_formed_code(code) {
        return Err(CoreError::InvalidOrExpiredOtp.into());
    }
    let now = Utc::now();

    let mut tx = pool.begin().await?;

    let otp = OtpRequestRepo::latest_active_for_update(&mut tx, &email, now)
        .await?
        .ok_or(CoreError::InvalidOrExpiredOtp)?;

    let matches = verify_password(code, &otp.otp_hash)
        .map_err(|e| AppError::InternalError(format!("OTP verification error: {e}")))?;
    if !matches {
        let burned =
            OtpRequestRepo::record_failed_attempt(&mut tx, otp.id, config.max_verify_attempts)
                .await?;
        tx.commit().await?;
        if burned {
            tracing::warn!(otp_request_id = otp.id, "OTP burned after repeated wrong guesses");
        } else {
            tracing::info!(otp_request_id = otp.id, "OTP mismatch");
        }
        return Err(CoreError::InvalidOrExpiredOtp.into());
    }

    if !OtpRequestRepo::mark_used(&mut tx, otp.id).await? {
        return Err(CoreError::InvalidOrExpiredOtp.into());
    }

    let (token, token_hash) = generate_session_token();
    let session = EmailSessionRepo::create(
        &mut tx,
        &CreateEmailSession {
            token_hash,
            email,
            expires_at: now + Duration::minutes(config.session_ttl_mins),
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(otp_request_id = otp.id, session_id = session.id, "Email session issued");

    Ok(IssuedSession {
        token,
        email: session.email,
        expires_at: session.expires_at,
    })
}

/// Resolve a presented bearer token to the email it proves.
///
/// A session found expired is flagged invalid on the spot, so it stays dead
/// even if clocks disagree later.
pub async fn resolve_session(pool: &DbPool, token: &str) -> AppResult<GuestIdentity> {
    let unauthorized = || AppError::Core(CoreError::Unauthorized("Invalid or expired session".into()));

    let token = token.trim();
    if token.is_empty() {
        return Err(unauthorized());
    }

    let session = EmailSessionRepo::find_by_token_hash(pool, &hash_session_token(token))
        .await?
        .ok_or_else(unauthorized)?;

    if !session.is_active_at(Utc::now()) {
        if session.valid {
            EmailSessionRepo::invalidate(pool, session.id).await?;
            tracing::debug!(session_id = session.id, "Expired email session invalidated");
        }
        return Err(unauthorized());
    }

    Ok(GuestIdentity {
        session_id: session.id,
        email: session.email,
        expires_at: session.expires_at,
    })
}
