//! OTP request model and DTOs.

use innkeep_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `otp_requests` table. `otp_hash` is an Argon2id PHC string.
#[derive(Debug, Clone, FromRow)]
pub struct OtpRequest {
    pub id: DbId,
    pub email: String,
    pub otp_hash: String,
    pub expires_at: Timestamp,
    pub used: bool,
    pub failed_attempts: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for persisting a freshly issued code.
pub struct CreateOtpRequest {
    pub email: String,
    pub otp_hash: String,
    pub expires_at: Timestamp,
}
